//! Sign-in against the spreadsheet-backed user list.
//!
//! The remote endpoint returns every user at once:
//!
//! ```json
//! { "success": true, "data": [ { "correo": "ana@school.org", "contraseña": 1234, "rol": "Alumno" } ] }
//! ```
//!
//! Fetching it is the caller's job; this module decodes the payload and
//! matches credentials. A successful login can be remembered in a
//! [`SessionStore`] and restored on the next launch until [`sign_out`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::drill_engine::error::AccountError;

pub const GUEST_EMAIL: &str = "invitado@ejemplo.com";
const DEFAULT_SERVER_ERROR: &str = "could not reach the server";

/// Role names (lowercase) that grant teacher rights. `teacher` is what
/// [`Role`]'s `Display` writes back into a [`SessionStore`].
const TEACHER_ROLES: &[&str] = &["admin", "profesor", "maestro", "teacher"];

/// Keys of a remembered login.
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const LOGGED_IN_KEY: &str = "userLoggedIn";
pub const USER_ROLE_KEY: &str = "userRol";

#[derive(Debug, Clone, Deserialize)]
pub struct SheetResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<UserRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "correo", alias = "email")]
    pub email: String,
    /// Sheets hand numeric passwords back as numbers.
    #[serde(rename = "contraseña", alias = "password", deserialize_with = "text_or_number")]
    pub password: String,
    #[serde(rename = "rol", alias = "role", default)]
    pub role: String,
}

fn text_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if TEACHER_ROLES.contains(&label.as_str()) {
            Role::Teacher
        } else {
            Role::Student
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Teacher
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Teacher => write!(f, "Teacher"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub role: Role,
}

impl Account {
    /// Identity shown when nobody is signed in.
    pub fn guest() -> Self {
        Account { email: GUEST_EMAIL.to_string(), role: Role::Student }
    }

    pub fn is_guest(&self) -> bool {
        self.email == GUEST_EMAIL
    }

    /// E-mail local part with its first letter capitalised: `ana.m@x` → `Ana.m`.
    pub fn display_name(&self) -> String {
        let local = self.email.split('@').next().unwrap_or_default();
        let mut chars = local.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Account::guest()
    }
}

pub fn parse_sheet_response(json: &str) -> Result<SheetResponse, AccountError> {
    Ok(serde_json::from_str(json)?)
}

/// Match `email` (case-insensitive) and `password` against the user list.
pub fn authenticate(
    response: &SheetResponse,
    email: &str,
    password: &str,
) -> Result<Account, AccountError> {
    if !response.success {
        let message = response
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string());
        warn!(%message, "user list request failed");
        return Err(AccountError::Server(message));
    }

    let wanted = email.trim().to_lowercase();
    let Some(user) = response.data.iter().find(|u| u.email.trim().to_lowercase() == wanted) else {
        warn!(email = %wanted, "login failed, user not found");
        return Err(AccountError::UserNotFound);
    };

    if user.password != password {
        warn!(email = %wanted, "login failed, wrong password");
        return Err(AccountError::WrongPassword);
    }

    let account = Account { email: user.email.clone(), role: Role::from_label(&user.role) };
    info!(email = %account.email, role = %account.role, "signed in");
    Ok(account)
}

/// Decode the raw payload and sign in.
pub fn sign_in(json: &str, email: &str, password: &str) -> Result<Account, AccountError> {
    let response = parse_sheet_response(json)?;
    authenticate(&response, email, password)
}

// ---------------------------------------------------------------------------
// Remembered login
// ---------------------------------------------------------------------------

/// String key-value storage that outlives the app (browser local storage,
/// a preferences file).
pub trait SessionStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
    fn clear(&mut self, key: &str);
}

/// In-memory [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Persist `account` so [`restore_session`] finds it next launch.
pub fn remember_login<S: SessionStore + ?Sized>(store: &mut S, account: &Account) {
    store.save(USER_EMAIL_KEY, &account.email);
    store.save(LOGGED_IN_KEY, "true");
    store.save(USER_ROLE_KEY, &account.role.to_string().to_lowercase());
}

/// The remembered login, if the store holds one.
///
/// Needs both an e-mail and the logged-in flag set to `true`; a missing
/// role means [`Role::Student`].
pub fn restore_session<S: SessionStore + ?Sized>(store: &S) -> Option<Account> {
    let email = store.load(USER_EMAIL_KEY).filter(|e| !e.trim().is_empty())?;
    if store.load(LOGGED_IN_KEY).as_deref() != Some("true") {
        debug!(%email, "stored login is not marked as signed in");
        return None;
    }
    let role = store.load(USER_ROLE_KEY).map(|r| Role::from_label(&r)).unwrap_or(Role::Student);
    info!(%email, %role, "restored login");
    Some(Account { email, role })
}

/// Sign in and remember the login on success.
pub fn sign_in_and_remember<S: SessionStore + ?Sized>(
    store: &mut S,
    json: &str,
    email: &str,
    password: &str,
) -> Result<Account, AccountError> {
    let account = sign_in(json, email, password)?;
    remember_login(store, &account);
    Ok(account)
}

/// Forget the remembered login and fall back to the guest.
pub fn sign_out<S: SessionStore + ?Sized>(store: &mut S) -> Account {
    for key in [USER_EMAIL_KEY, LOGGED_IN_KEY, USER_ROLE_KEY] {
        store.clear(key);
    }
    info!("signed out");
    Account::guest()
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = r#"{
        "success": true,
        "data": [
            {"correo": "Ana@School.org", "contraseña": 1234, "rol": "Alumno"},
            {"correo": "luis@school.org", "contraseña": "s3cret", "rol": "Profesor"},
            {"correo": "root@school.org", "contraseña": "x", "rol": "ADMIN"}
        ]
    }"#;

    #[test]
    fn email_match_ignores_case_and_numeric_password_compares_as_text() {
        let account = sign_in(USERS, "  ana@school.ORG ", "1234").unwrap();
        assert_eq!(account.email, "Ana@School.org");
        assert_eq!(account.role, Role::Student);
        assert_eq!(account.display_name(), "Ana");
    }

    #[test]
    fn teacher_roles_are_recognised() {
        assert_eq!(sign_in(USERS, "luis@school.org", "s3cret").unwrap().role, Role::Teacher);
        assert!(sign_in(USERS, "root@school.org", "x").unwrap().role.is_admin());
        assert_eq!(Role::from_label("Maestro"), Role::Teacher);
        assert_eq!(Role::from_label("alumno"), Role::Student);
    }

    #[test]
    fn unknown_user_and_wrong_password() {
        assert!(matches!(sign_in(USERS, "nobody@school.org", "1"), Err(AccountError::UserNotFound)));
        assert!(matches!(sign_in(USERS, "luis@school.org", "S3CRET"), Err(AccountError::WrongPassword)));
    }

    #[test]
    fn server_failure_carries_its_message() {
        let err = sign_in(r#"{"success": false, "message": "quota exceeded"}"#, "a@b", "c").unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");

        let err = sign_in(r#"{"success": false}"#, "a@b", "c").unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_SERVER_ERROR);
    }

    #[test]
    fn malformed_payload() {
        assert!(matches!(sign_in("<html>", "a@b", "c"), Err(AccountError::Malformed(_))));
    }

    #[test]
    fn guest_identity() {
        let guest = Account::default();
        assert!(guest.is_guest());
        assert_eq!(guest.email, "invitado@ejemplo.com");
        assert_eq!(guest.display_name(), "Invitado");
        assert_eq!(guest.role, Role::Student);
    }

    #[test]
    fn login_is_remembered_and_restored() {
        let mut store = MemoryStore::default();
        assert!(restore_session(&store).is_none());

        let account = sign_in_and_remember(&mut store, USERS, "luis@school.org", "s3cret").unwrap();
        assert_eq!(store.load(USER_EMAIL_KEY).as_deref(), Some("luis@school.org"));
        assert_eq!(store.load(LOGGED_IN_KEY).as_deref(), Some("true"));
        assert_eq!(restore_session(&store), Some(account));
    }

    #[test]
    fn failed_login_leaves_the_store_alone() {
        let mut store = MemoryStore::default();
        assert!(sign_in_and_remember(&mut store, USERS, "luis@school.org", "nope").is_err());
        assert_eq!(store, MemoryStore::default());
    }

    #[test]
    fn restore_reads_the_stored_role_label() {
        let mut store = MemoryStore::default();
        store.save(USER_EMAIL_KEY, "ana@school.org");
        store.save(LOGGED_IN_KEY, "true");
        store.save(USER_ROLE_KEY, "Profesor");
        assert_eq!(restore_session(&store).unwrap().role, Role::Teacher);

        store.clear(USER_ROLE_KEY);
        assert_eq!(restore_session(&store).unwrap().role, Role::Student);
    }

    #[test]
    fn restore_needs_the_logged_in_flag() {
        let mut store = MemoryStore::default();
        store.save(USER_EMAIL_KEY, "ana@school.org");
        assert!(restore_session(&store).is_none());
        store.save(LOGGED_IN_KEY, "false");
        assert!(restore_session(&store).is_none());
    }

    #[test]
    fn sign_out_clears_the_store_and_returns_the_guest() {
        let mut store = MemoryStore::default();
        sign_in_and_remember(&mut store, USERS, "root@school.org", "x").unwrap();
        store.save("theme", "dark");

        let account = sign_out(&mut store);
        assert!(account.is_guest());
        assert!(restore_session(&store).is_none());
        for key in [USER_EMAIL_KEY, LOGGED_IN_KEY, USER_ROLE_KEY] {
            assert!(store.load(key).is_none(), "{key} survived sign-out");
        }
        // unrelated keys stay
        assert_eq!(store.load("theme").as_deref(), Some("dark"));
    }
}
