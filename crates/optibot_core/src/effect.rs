#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadArticles { identifiers: Vec<String> },
}
