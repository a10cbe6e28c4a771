use clap::ValueEnum;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for people
    #[default]
    Human,
    /// A single JSON document on stdout
    Json,
}
