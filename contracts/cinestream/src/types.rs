use near_sdk::near;

/// Stored movie record. The title is the map key.
#[derive(Clone, Debug, PartialEq)]
#[near(serializers = [borsh])]
pub struct Movie {
    pub description: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
#[near(serializers = [json])]
pub struct MovieView {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl MovieView {
    pub fn new(title: &str, movie: &Movie) -> Self {
        Self {
            title: title.to_string(),
            description: movie.description.clone(),
            url: movie.url.clone(),
        }
    }
}
