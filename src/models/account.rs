// src/models/account.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::listing::Searchable;
use crate::models::wire;

// --- PAPÉIS ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "PERSONAL_CENTRO_DE_SERVICIOS")]
    Staff,
    #[serde(rename = "USER")]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "PERSONAL_CENTRO_DE_SERVICIOS",
            Role::Customer => "USER",
        }
    }

    /// Lê o papel como vem no token ("ADMIN", "ROLE_ADMIN", ...).
    pub fn from_claim(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        let raw = raw.strip_prefix("ROLE_").unwrap_or(raw);
        match raw.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "PERSONAL_CENTRO_DE_SERVICIOS" => Some(Role::Staff),
            "USER" => Some(Role::Customer),
            _ => None,
        }
    }
}

// --- CONTA ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "wire::opt_id")]
    pub id: Option<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub business_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    // Aprovação do cadastro pelo admin
    #[serde(default, deserialize_with = "wire::flag")]
    pub permiso: bool,
}

impl Searchable for Account {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_deref().unwrap_or(""), self.username.as_str()]
    }
}

impl Account {
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self
            .phone_number
            .as_deref()?
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            None
        } else {
            Some(format!("https://wa.me/{}", digits))
        }
    }
}

// Linha do diretório de clientes do staff
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContact {
    #[serde(flatten)]
    pub account: Account,
    pub whatsapp_link: Option<String>,
}

impl From<Account> for CustomerContact {
    fn from(account: Account) -> Self {
        let whatsapp_link = account.whatsapp_link();
        Self { account, whatsapp_link }
    }
}

// =============================================================================
//  VALIDAÇÕES
// =============================================================================

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ]+$").expect("regex de username"));
static BUSINESS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ ]+$").expect("regex de nome comercial"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9}$").expect("regex de telefone"));

fn strength_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("password_strength");
    err.message = Some(message.into());
    err
}

// Cadastro: maiúscula, minúscula, dígito e um de !@#$&*
fn validate_register_password(val: &str) -> Result<(), ValidationError> {
    let ok = val.chars().any(|c| c.is_ascii_uppercase())
        && val.chars().any(|c| c.is_ascii_lowercase())
        && val.chars().any(|c| c.is_ascii_digit())
        && val.chars().any(|c| "!@#$&*".contains(c));
    if ok {
        Ok(())
    } else {
        Err(strength_error(
            "La contraseña debe tener una mayúscula, una minúscula, un número y un carácter especial (!@#$&*).",
        ))
    }
}

// Redefinição: maiúscula, dígito e um de !@#$%^&*
fn validate_reset_password(val: &str) -> Result<(), ValidationError> {
    let ok = val.chars().any(|c| c.is_ascii_uppercase())
        && val.chars().any(|c| c.is_ascii_digit())
        && val.chars().any(|c| "!@#$%^&*".contains(c));
    if ok {
        Ok(())
    } else {
        Err(strength_error(
            "La contraseña debe tener una mayúscula, un número y un carácter especial (!@#$%^&*).",
        ))
    }
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(
        length(min = 5, max = 50, message = "El usuario debe tener entre 5 y 50 caracteres."),
        regex(path = *USERNAME_RE, message = "El usuario solo puede contener letras.")
    )]
    #[schema(example = "carlosmendez")]
    pub username: String,

    #[validate(
        length(min = 2, max = 50, message = "El nombre comercial debe tener entre 2 y 50 caracteres."),
        regex(path = *BUSINESS_NAME_RE, message = "El nombre comercial solo puede contener letras y espacios.")
    )]
    #[schema(example = "Taller Mendez")]
    pub business_name: String,

    #[validate(email(message = "El correo electrónico no es válido."))]
    pub email: String,

    /// 9 dígitos, sem o prefixo +593
    #[validate(regex(path = *PHONE_RE, message = "El teléfono debe tener exactamente 9 dígitos."))]
    #[schema(example = "987654321")]
    pub phone_number: String,

    #[validate(
        length(min = 8, message = "La contraseña debe tener al menos 8 caracteres."),
        custom(function = "validate_register_password")
    )]
    pub password: String,
}

// Corpo aceito pelo backend em /api/v1/register-user
#[derive(Debug, Serialize)]
pub struct RegisterBody {
    pub username: String,
    pub business_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl From<RegisterPayload> for RegisterBody {
    fn from(p: RegisterPayload) -> Self {
        Self {
            username: p.username,
            business_name: p.business_name,
            email: p.email,
            phone_number: format!("+593{}", p.phone_number),
            password: p.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetPayload {
    #[validate(length(min = 1, message = "El token es obligatorio."))]
    pub token: String,

    #[validate(
        length(min = 8, max = 50, message = "La contraseña debe tener entre 8 y 50 caracteres."),
        custom(function = "validate_reset_password")
    )]
    pub new_password: String,
}

/// Campos editáveis do perfil do cliente. Só os presentes são enviados.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdatePayload {
    #[validate(length(min = 2, max = 50, message = "El nombre comercial debe tener entre 2 y 50 caracteres."))]
    pub business_name: Option<String>,

    #[validate(email(message = "El correo electrónico no es válido."))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "El teléfono no puede estar vacío."))]
    pub phone_number: Option<String>,
}

impl ProfileUpdatePayload {
    /// Um par (campo, valor) por campo alterado, na ordem em que o backend recebe.
    pub fn changed_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.business_name {
            fields.push(("businessName", v.clone()));
        }
        if let Some(v) = &self.email {
            fields.push(("email", v.clone()));
        }
        if let Some(v) = &self.phone_number {
            fields.push(("phoneNumber", v.clone()));
        }
        fields
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangePayload {
    #[validate(length(min = 1, message = "La contraseña actual es obligatoria."))]
    pub current_password: String,

    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres."))]
    pub new_password: String,

    pub repeat_new_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeBody<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountPayload {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, phone: &str, password: &str) -> RegisterPayload {
        RegisterPayload {
            username: username.into(),
            business_name: "Taller Mendez".into(),
            email: "carlos@taller.ec".into(),
            phone_number: phone.into(),
            password: password.into(),
        }
    }

    #[test]
    fn valid_registration_passes_and_gets_country_prefix() {
        let payload = register("carlosm", "987654321", "Secreta1!");
        assert!(payload.validate().is_ok());
        let body = RegisterBody::from(payload);
        assert_eq!(body.phone_number, "+593987654321");
    }

    #[test]
    fn registration_rules_are_enforced() {
        let errors = register("ab1", "12345", "simple").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("phone_number"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn reset_password_needs_upper_digit_and_symbol() {
        let weak = PasswordResetPayload { token: "t".into(), new_password: "abcdefgh1".into() };
        assert!(weak.validate().is_err());
        let strong = PasswordResetPayload { token: "t".into(), new_password: "Abcdefg1%".into() };
        assert!(strong.validate().is_ok());
    }

    #[test]
    fn role_claims_are_parsed_with_or_without_prefix() {
        assert_eq!(Role::from_claim("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_claim("PERSONAL_CENTRO_DE_SERVICIOS"), Some(Role::Staff));
        assert_eq!(Role::from_claim("user"), Some(Role::Customer));
        assert_eq!(Role::from_claim("ROOT"), None);
    }

    #[test]
    fn whatsapp_link_keeps_only_digits() {
        let account = Account {
            id: Some("1".into()),
            username: "ana".into(),
            business_name: None,
            email: None,
            phone_number: Some("+593 98-765-4321".into()),
            role: None,
            permiso: true,
        };
        assert_eq!(account.whatsapp_link().as_deref(), Some("https://wa.me/593987654321"));
    }
}
