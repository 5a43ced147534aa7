pub mod gate;
pub mod invariant;
pub mod verifier;

pub use gate::{authorize_admin, resolve_admin_actor, verify_caller, Actor};
pub use invariant::{ensure_admin_exists, ensure_user_has_role, EntropyPicker, Picker};
pub use verifier::{AuthenticatorClient, CredentialVerifier};
