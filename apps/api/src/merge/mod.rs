// Résumé merge engine.
// Reduces many parsed résumé records into one deduplicated master record.
// The core (text through assembler) is pure and synchronous; handlers and loader
// are the HTTP and batch-directory surfaces around it.

pub mod assembler;
pub mod basics;
pub mod config;
pub mod dates;
pub mod handlers;
pub mod loader;
pub mod sections;
pub mod similarity;
pub mod skills;
pub mod text;
pub mod work;
