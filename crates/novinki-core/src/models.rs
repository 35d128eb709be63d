mod release;

pub use release::{format_rating, ReleaseItem, ReleaseKind, ReleasesBody};
