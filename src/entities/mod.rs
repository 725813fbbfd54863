// Entity Models
//
// - PatronType: fixed SIS category table + distance suffix
// - Coadmit: partner college program codes
// - Patron: the normalized record handed to the renderer

pub mod coadmit;
pub mod patron;
pub mod patron_type;

pub use coadmit::coadmit_code;
pub use patron::{
    classify_email, classify_phone, derive_department, normalize_phone, Address, AddressType,
    Department, Email, EmailType, Patron, Phone, PhoneType,
};
pub use patron_type::{PatronCategory, PatronType, DISTANCE_SUFFIX};
