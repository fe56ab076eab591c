//! Outbound links from the detail overlay, opened in the system browser
use std::fmt;

/// External page a film title can be looked up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundLink {
    /// IMDb title search
    Identity,
    /// JustWatch "where to watch" search
    WhereToWatch,
}

impl OutboundLink {
    /// URL of this link for a title, with the title percent-encoded
    pub fn url_for(self, title: &str) -> String {
        let base = match self {
            Self::Identity => "https://www.imdb.com/find?q=",
            Self::WhereToWatch => "https://www.justwatch.com/fr/recherche?q=",
        };
        format!("{}{}", base, urlencoding::encode(title))
    }
}

impl fmt::Display for OutboundLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "IMDb"),
            Self::WhereToWatch => write!(f, "Où regarder"),
        }
    }
}

/// Open `url` in the default browser
pub async fn open_in_browser(url: String) -> Result<(), String> {
    tokio::task::spawn_blocking(move || open::that(&url).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_url() {
        assert_eq!(
            OutboundLink::Identity.url_for("Le Mépris"),
            "https://www.imdb.com/find?q=Le%20M%C3%A9pris"
        );
    }

    #[test]
    fn test_where_to_watch_url() {
        assert_eq!(
            OutboundLink::WhereToWatch.url_for("2001 : L'Odyssée"),
            "https://www.justwatch.com/fr/recherche?q=2001%20%3A%20L%27Odyss%C3%A9e"
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(OutboundLink::Identity.to_string(), "IMDb");
        assert_eq!(OutboundLink::WhereToWatch.to_string(), "Où regarder");
    }
}
