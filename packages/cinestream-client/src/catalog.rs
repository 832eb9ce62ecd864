//! Featured movies shown by the client.

use serde::Deserialize;

/// A movie as listed by the contract's `get_movies` view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListedMovie {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// A movie on the featured shelf. The title is the on-chain key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedMovie {
    pub title: &'static str,
    pub description: &'static str,
    pub poster: &'static str,
    pub reward: &'static str,
}

pub static FEATURED: [FeaturedMovie; 3] = [
    FeaturedMovie {
        title: "Quantum Heist",
        description: "A thrilling sci-fi adventure through time and space.",
        poster: "./assets/quantum.jpg",
        reward: "10 CINE",
    },
    FeaturedMovie {
        title: "Mystic Forest",
        description: "An enchanting journey through magical realms.",
        poster: "./assets/forest.jpg",
        reward: "10 CINE",
    },
    FeaturedMovie {
        title: "Neon City",
        description: "A cyberpunk thriller in a neon-lit metropolis.",
        poster: "./assets/city.jpg",
        reward: "10 CINE",
    },
];

/// Case-sensitive lookup by title.
pub fn find(title: &str) -> Option<&'static FeaturedMovie> {
    FEATURED.iter().find(|m| m.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_unique() {
        for (i, a) in FEATURED.iter().enumerate() {
            assert!(FEATURED[i + 1..].iter().all(|b| b.title != a.title));
        }
    }

    #[test]
    fn listed_movie_from_view_json() {
        let movies: Vec<ListedMovie> = serde_json::from_str(
            r#"[{"title":"Neon City","description":"Cyberpunk","url":"ipfs://neon"}]"#,
        )
        .unwrap();
        assert_eq!(movies[0].title, "Neon City");
        assert_eq!(movies[0].url, "ipfs://neon");
    }

    #[test]
    fn find_matches_exact_title() {
        assert_eq!(find("Neon City").map(|m| m.poster), Some("./assets/city.jpg"));
        assert!(find("neon city").is_none());
        assert!(find("").is_none());
    }
}
