//! Turns articles into publishable post text.
//!
//! [`Rewriter`] produces a length-bounded body from a headline, and
//! [`TagComposer`] appends a mention, hashtags, and the link under the
//! platform limit. [`Composer`] chains the two.

pub mod composer;
pub mod error;
pub mod keywords;
pub mod post;
pub mod rewrite;
pub mod tags;

pub use composer::Composer;
pub use error::ComposeError;
pub use keywords::select_image_keyword;
pub use post::ComposedPost;
pub use rewrite::{Lexicon, RewriteConfig, Rewriter};
pub use tags::{TagComposer, TagConfig};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The generator behind every creative choice: fixed when `seed` is given,
/// otherwise seeded from the OS.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
