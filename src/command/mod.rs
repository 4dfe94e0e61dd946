pub mod transform;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Rename packages and rewrite bundle identities in OSGi manifests.
    Transform(transform::TransformArgs),
}
