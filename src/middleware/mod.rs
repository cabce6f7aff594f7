pub mod permission;
pub mod session;

pub use permission::{
    require_admin, require_auth, require_role, ROL_ADMINISTRADOR, ROL_COMPRADOR,
    ROL_GUARDIA_COMPRAS, ROL_VENDEDOR,
};
pub use session::{CookieStore, SessionContext, SessionStore};
