use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, registry};
use tracing_tree::HierarchicalLayer;

/// Installs the global subscriber. `RUST_LOG` overrides the default `warn`
/// filter. Output goes to stderr so command output stays pipeable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let tree = HierarchicalLayer::new(2)
        .with_writer(std::io::stderr)
        .with_indent_lines(true)
        .with_targets(true)
        .with_bracketed_fields(true);
    if let Err(e) = registry().with(filter).with(tree).try_init() {
        eprintln!("panefold: logging was already initialized: {e}");
    }
}
