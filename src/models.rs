use serde::Deserialize;

/// A movie as submitted for insertion, before ownership is assigned.
#[derive(Clone, Debug)]
pub struct NewMovie {
    pub name: String,
    pub director: String,
    pub year: i32,
    pub poster_url: Option<String>,
}

/// Partial update for a movie. `None` leaves a field unchanged; for the
/// poster, `Some(None)` clears it.
#[derive(Clone, Debug, Default)]
pub struct MovieUpdate {
    pub name: Option<String>,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub poster_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
