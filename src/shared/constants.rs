/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum length for category names and article titles
pub const MAX_NAME_LENGTH: u64 = 120;

/// Minimum search query length, counted after trimming
pub const MIN_SEARCH_QUERY_LENGTH: usize = 2;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - can manage categories, edit any article, run cleanup
pub const ROLE_ADMIN: &str = "admin";

/// Member role - can author articles, ask questions, post answers
#[allow(dead_code)]
pub const ROLE_MEMBER: &str = "member";
