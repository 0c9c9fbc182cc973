// Fusion Module - Candidate Evidence → Resolved Attributes
//
// Candidate builders produce trust-tagged fallback evidence; the resolver
// reconciles it with scraped evidence, one attribute at a time.

pub mod candidates;
pub mod resolver;

pub use candidates::CandidateBuilder;
pub use resolver::AttributeResolver;
