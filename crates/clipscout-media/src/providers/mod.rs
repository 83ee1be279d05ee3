//! Metadata provider tiers, ordered by fidelity.

mod mirror;
mod oembed;
mod player;

pub use mirror::MirrorProvider;
pub use oembed::OEmbedProvider;
pub use player::PlayerProvider;
