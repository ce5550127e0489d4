use thiserror::Error;

/// Errors raised while reading the catalog source.
///
/// Any of these is fatal to startup: the caller should report it and abort
/// rather than continue with a partially loaded catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be read or is not well-formed CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// The header row has no column with the required name.
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Errors raised while answering a recommendation query.
///
/// These are recoverable: the caller reports them to the end user and keeps
/// serving.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The queried title has no matching catalog entry.
    #[error("title not found: `{title}`")]
    TitleNotFound { title: String },
}
