pub mod guards;
pub mod jwks;
pub mod model;
pub mod validator;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
