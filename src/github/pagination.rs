/// Links extracted from a `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Absolute URL of the next page (from rel="next").
    pub next: Option<String>,
    /// Absolute URL of the last page (from rel="last").
    pub last: Option<String>,
}

/// Parse the Link header to extract pagination links.
///
/// Headers look like:
/// `<https://api.github.com/search/repositories?q=x&page=2>; rel="next", <...&page=10>; rel="last"`
pub fn parse_link_header(link_header: &str) -> PageLinks {
    let mut links = PageLinks::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel) {
            match rel {
                "next" => links.next = Some(url.to_string()),
                "last" => links.last = Some(url.to_string()),
                _ => {}
            }
        }
    }

    links
}
