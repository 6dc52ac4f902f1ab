// src/common/id_generator.rs
//! Crockford Base32 ID generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., P_K7NP3X for projects). The alphabet
//! excludes I, L, O and U so IDs are easy to read and communicate.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Admin account (U_)
    Admin,
    /// About singleton (A_)
    About,
    /// Project (P_)
    Project,
    /// Skill (S_)
    Skill,
    /// Experience (X_)
    Experience,
    /// Certificate (C_)
    Certificate,
    /// Social link (L_)
    Social,
    /// Contact message (M_)
    Contact,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Admin => "U",
            EntityPrefix::About => "A",
            EntityPrefix::Project => "P",
            EntityPrefix::Skill => "S",
            EntityPrefix::Experience => "X",
            EntityPrefix::Certificate => "C",
            EntityPrefix::Social => "L",
            EntityPrefix::Contact => "M",
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID in the format "PREFIX_XXXXXX" (e.g., "P_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix.
/// Used for storage keys and other non-entity identifiers.
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

// ============================================================================
// Convenience functions for each entity type
// ============================================================================

pub fn generate_admin_id() -> String {
    generate_id(EntityPrefix::Admin)
}

pub fn generate_about_id() -> String {
    generate_id(EntityPrefix::About)
}

pub fn generate_project_id() -> String {
    generate_id(EntityPrefix::Project)
}

pub fn generate_skill_id() -> String {
    generate_id(EntityPrefix::Skill)
}

pub fn generate_experience_id() -> String {
    generate_id(EntityPrefix::Experience)
}

pub fn generate_certificate_id() -> String {
    generate_id(EntityPrefix::Certificate)
}

pub fn generate_social_id() -> String {
    generate_id(EntityPrefix::Social)
}

pub fn generate_contact_id() -> String {
    generate_id(EntityPrefix::Contact)
}
