use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter into the native expression of a backend
    Compile {
        #[arg(long, help = "Filter file path (JSON)")]
        filter: String,

        #[arg(long, help = "Schema file path (JSON); without it every attribute is unknown")]
        schema: Option<String>,

        #[arg(long, value_enum, default_value_t = BackendKind::Document)]
        backend: BackendKind,

        #[arg(
            long,
            help = "If set, prints the compiled expression and its consistency flag as JSON"
        )]
        json: bool,
    },
    /// Print the filter tree with the schema verdict of every node
    Explain {
        #[arg(long, help = "Filter file path (JSON)")]
        filter: String,

        #[arg(long, help = "Schema file path (JSON)")]
        schema: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Document,
    Directory,
}
