// Résumé records: nested-history codec, form normalizer, search engine and the
// collection store the handlers read snapshots from.

pub mod codec;
pub mod experience;
pub mod handlers;
pub mod normalize;
pub mod search;
pub mod store;
