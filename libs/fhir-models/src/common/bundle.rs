//! FHIR Bundle model

use super::codes::{BundleType, HttpVerb, SearchEntryMode};
use super::error::Result;
use ferrum_codec::{
    encode_value, fhir_backbone, fhir_resource, AnyResource, Codec, Decimal, Identifier, Instant,
    Primitive, Resource, Signature, UnsignedInt, Uri,
};
use serde_json::Value;

fhir_backbone! {
    /// Links related to this Bundle
    pub struct BundleLink: "Bundle.link" {
        /// See http://www.iana.org/assignments/link-relations/link-relations.xhtml#link-relations-1
        relation: Primitive<String> => required("relation"),
        /// Reference details for the link
        url: Primitive<Uri> => required("url"),
    }
}

fhir_backbone! {
    /// Search-related information for a Bundle entry
    pub struct BundleEntrySearch: "Bundle.entry.search" {
        /// Why this entry is in the result set
        mode: Option<Primitive<SearchEntryMode>> => opt("mode"),
        /// Search ranking (between 0 and 1)
        score: Option<Primitive<Decimal>> => opt("score"),
    }
}

fhir_backbone! {
    /// Request details for a Bundle entry
    pub struct BundleEntryRequest: "Bundle.entry.request" {
        method: Primitive<HttpVerb> => required("method"),
        /// URL for HTTP equivalent of this entry
        url: Primitive<Uri> => required("url"),
        /// For managing cache validation
        if_none_match: Option<Primitive<String>> => opt("ifNoneMatch"),
        if_modified_since: Option<Primitive<Instant>> => opt("ifModifiedSince"),
        /// For managing update contention
        if_match: Option<Primitive<String>> => opt("ifMatch"),
        /// For conditional creates
        if_none_exist: Option<Primitive<String>> => opt("ifNoneExist"),
    }
}

fhir_backbone! {
    /// Results of execution (transaction/batch/history)
    pub struct BundleEntryResponse: "Bundle.entry.response" {
        /// Status response code (text)
        status: Primitive<String> => required("status"),
        location: Option<Primitive<Uri>> => opt("location"),
        etag: Option<Primitive<String>> => opt("etag"),
        last_modified: Option<Primitive<Instant>> => opt("lastModified"),
        /// OperationOutcome with hints and warnings (for batch/transaction)
        outcome: Option<AnyResource> => opt("outcome"),
    }
}

fhir_backbone! {
    /// Entry in the bundle - will have a resource or information
    pub struct BundleEntry: "Bundle.entry" {
        link: Vec<BundleLink> => list("link"),
        /// Full URL for the entry (relative to the base URL, or absolute)
        full_url: Option<Primitive<Uri>> => opt("fullUrl"),
        /// A resource in this bundle
        resource: Option<AnyResource> => opt("resource"),
        search: Option<BundleEntrySearch> => opt("search"),
        request: Option<BundleEntryRequest> => opt("request"),
        response: Option<BundleEntryResponse> => opt("response"),
    }
}

fhir_resource! {
    /// FHIR Bundle resource
    ///
    /// A container for a collection of resources.
    pub struct Bundle: resource "Bundle" {
        identifier: Option<Identifier> => opt("identifier"),
        /// Indicates the purpose of this bundle - how it was intended to be used
        type_: Primitive<BundleType> => required("type"),
        /// When the bundle was assembled
        timestamp: Option<Primitive<Instant>> => opt("timestamp"),
        /// If search, the total number of matches
        total: Option<Primitive<UnsignedInt>> => opt("total"),
        link: Vec<BundleLink> => list("link"),
        entry: Vec<BundleEntry> => list("entry"),
        /// Digital Signature
        signature: Option<Signature> => opt("signature"),
    }
}

impl BundleEntry {
    /// Entry holding a resource under the given full URL.
    pub fn with_resource(full_url: Option<&str>, resource: AnyResource) -> Self {
        Self {
            full_url: full_url.map(Primitive::from),
            resource: Some(resource),
            ..Default::default()
        }
    }
}

impl Bundle {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            type_: Primitive::new(bundle_type),
            ..Default::default()
        }
    }

    /// Parse from JSON Value
    pub fn from_value(codec: &Codec<'_>, value: &Value) -> Result<Self> {
        Ok(codec.decode_value_as(value)?)
    }

    /// Parse from raw JSON bytes
    pub fn from_slice(codec: &Codec<'_>, bytes: &[u8]) -> Result<Self> {
        Ok(codec.decode_as(bytes)?)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Value {
        encode_value(self)
    }

    pub fn bundle_type(&self) -> Option<BundleType> {
        self.type_.value
    }

    /// Check if this is a transaction bundle
    pub fn is_transaction(&self) -> bool {
        matches!(self.bundle_type(), Some(BundleType::Transaction))
    }

    /// Check if this is a batch bundle
    pub fn is_batch(&self) -> bool {
        matches!(self.bundle_type(), Some(BundleType::Batch))
    }

    /// Check if this is a search result bundle
    pub fn is_searchset(&self) -> bool {
        matches!(self.bundle_type(), Some(BundleType::Searchset))
    }

    /// Get the number of entries in the bundle
    pub fn entry_count(&self) -> usize {
        self.entry.len()
    }

    /// Get entries as a slice
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entry
    }

    /// Get entries as a mutable slice
    pub fn entries_mut(&mut self) -> &mut [BundleEntry] {
        &mut self.entry
    }

    /// Add an entry to the bundle
    pub fn add_entry(&mut self, entry: BundleEntry) {
        self.entry.push(entry);
    }

    /// Add a link to the bundle
    pub fn add_link(&mut self, relation: &str, url: &str) {
        self.link.push(BundleLink {
            relation: Primitive::from(relation),
            url: Primitive::from(url),
            ..Default::default()
        });
    }

    /// Entry resources in document order, skipping entries without one.
    pub fn resources(&self) -> impl Iterator<Item = &AnyResource> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }

    /// Entry resources of one concrete type.
    pub fn resources_of<R: Resource>(&self) -> impl Iterator<Item = &R> {
        self.resources().filter_map(AnyResource::downcast_ref::<R>)
    }
}
