//! Choice-type (`value[x]`) slots.
//!
//! A choice element is stored under exactly one of several keys formed from
//! a base name and a type suffix (`valueQuantity`, `valueString`, ...).
//! Implementations are normally generated with [`fhir_choice!`](crate::fhir_choice).

use crate::error::DecodeError;
use crate::reader::ObjectReader;
use crate::writer::ObjectWriter;

pub trait FhirChoice: Sized {
    /// Allowed type suffixes in declaration order.
    const SUFFIXES: &'static [&'static str];

    /// Decode the variant selected by `suffix` from `key`.
    fn decode_variant(
        reader: &mut ObjectReader<'_, '_, '_>,
        key: &str,
        suffix: &str,
    ) -> Result<Option<Self>, DecodeError>;

    /// Suffix of the populated variant.
    fn suffix(&self) -> &'static str;

    /// Write the populated variant under `base` + suffix.
    fn encode_variant(&self, writer: &mut ObjectWriter, base: &str);

    /// Full key this value is stored under for a given base name.
    fn key(&self, base: &str) -> String {
        format!("{}{}", base, self.suffix())
    }
}
