//! General-purpose and metadata datatypes, plus [`DataValue`], the open
//! choice used by `Extension.value[x]` and `Parameters.parameter.value[x]`.

use crate::primitive::{
    Base64Binary, Canonical, Code, Date, DateTime, Id, Instant, Markdown, Oid, PositiveInt,
    Primitive, Time, UnsignedInt, Uri, Url, Uuid, Xhtml,
};
use rust_decimal::Decimal;

crate::fhir_element! {
    /// A code defined by a terminology system.
    pub struct Coding: "Coding" {
        system: Option<Primitive<Uri>> => opt("system"),
        version: Option<Primitive<String>> => opt("version"),
        code: Option<Primitive<Code>> => opt("code"),
        display: Option<Primitive<String>> => opt("display"),
        user_selected: Option<Primitive<bool>> => opt("userSelected"),
    }
}

impl Coding {
    pub fn new(system: &str, code: &str) -> Self {
        Self {
            system: Some(Primitive::from(system)),
            code: Some(Primitive::from(code)),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(Primitive::from(display));
        self
    }
}

crate::fhir_element! {
    /// Concept expressed as codings and/or text.
    pub struct CodeableConcept: "CodeableConcept" {
        coding: Vec<Coding> => list("coding"),
        text: Option<Primitive<String>> => opt("text"),
    }
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            ..Default::default()
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            text: Some(Primitive::from(text)),
            ..Default::default()
        }
    }

    /// Whether any coding matches `system` and `code`.
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|c| {
            c.system.as_ref().and_then(Primitive::as_str) == Some(system)
                && c.code.as_ref().and_then(Primitive::as_str) == Some(code)
        })
    }
}

macro_rules! quantity_like {
    ($($(#[$meta:meta])* $name:ident => $type_name:literal),+ $(,)?) => {
        $(
            crate::fhir_element! {
                $(#[$meta])*
                pub struct $name: $type_name {
                    value: Option<Primitive<Decimal>> => opt("value"),
                    comparator: Option<Primitive<Code>> => opt("comparator"),
                    unit: Option<Primitive<String>> => opt("unit"),
                    system: Option<Primitive<Uri>> => opt("system"),
                    code: Option<Primitive<Code>> => opt("code"),
                }
            }

            impl $name {
                /// A UCUM-coded amount.
                pub fn ucum(value: Decimal, code: &str) -> Self {
                    Self {
                        value: Some(Primitive::new(value)),
                        unit: Some(Primitive::from(code)),
                        system: Some(Primitive::from("http://unitsofmeasure.org")),
                        code: Some(Primitive::from(code)),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

quantity_like! {
    /// A measured amount.
    Quantity => "Quantity",
    Age => "Age",
    Count => "Count",
    Distance => "Distance",
    Duration => "Duration",
}

crate::fhir_element! {
    pub struct Money: "Money" {
        value: Option<Primitive<Decimal>> => opt("value"),
        currency: Option<Primitive<Code>> => opt("currency"),
    }
}

crate::fhir_element! {
    /// Time range defined by start and end date/time.
    pub struct Period: "Period" {
        start: Option<Primitive<DateTime>> => opt("start"),
        end: Option<Primitive<DateTime>> => opt("end"),
    }
}

crate::fhir_element! {
    pub struct Range: "Range" {
        low: Option<Quantity> => opt("low"),
        high: Option<Quantity> => opt("high"),
    }
}

crate::fhir_element! {
    pub struct Ratio: "Ratio" {
        numerator: Option<Quantity> => opt("numerator"),
        denominator: Option<Quantity> => opt("denominator"),
    }
}

crate::fhir_element! {
    /// A reference from one resource to another.
    pub struct Reference: "Reference" {
        reference: Option<Primitive<String>> => opt("reference"),
        type_: Option<Primitive<Uri>> => opt("type"),
        identifier: Option<Identifier> => opt("identifier"),
        display: Option<Primitive<String>> => opt("display"),
    }
}

impl Reference {
    pub fn to(reference: &str) -> Self {
        Self {
            reference: Some(Primitive::from(reference)),
            ..Default::default()
        }
    }

    /// The id of a contained resource when this is a local `#id` reference.
    pub fn local_id(&self) -> Option<&str> {
        self.reference
            .as_ref()
            .and_then(Primitive::as_str)
            .and_then(|r| r.strip_prefix('#'))
    }
}

crate::fhir_element! {
    /// An identifier intended for computation.
    pub struct Identifier: "Identifier" {
        use_: Option<Primitive<Code>> => opt("use"),
        type_: Option<CodeableConcept> => opt("type"),
        system: Option<Primitive<Uri>> => opt("system"),
        value: Option<Primitive<String>> => opt("value"),
        period: Option<Period> => opt("period"),
        assigner: Option<Box<Reference>> => opt("assigner"),
    }
}

impl Identifier {
    pub fn new(system: &str, value: &str) -> Self {
        Self {
            system: Some(Primitive::from(system)),
            value: Some(Primitive::from(value)),
            ..Default::default()
        }
    }
}

crate::fhir_element! {
    pub struct HumanName: "HumanName" {
        use_: Option<Primitive<Code>> => opt("use"),
        text: Option<Primitive<String>> => opt("text"),
        family: Option<Primitive<String>> => opt("family"),
        given: Vec<Primitive<String>> => list("given"),
        prefix: Vec<Primitive<String>> => list("prefix"),
        suffix: Vec<Primitive<String>> => list("suffix"),
        period: Option<Period> => opt("period"),
    }
}

crate::fhir_element! {
    pub struct Address: "Address" {
        use_: Option<Primitive<Code>> => opt("use"),
        type_: Option<Primitive<Code>> => opt("type"),
        text: Option<Primitive<String>> => opt("text"),
        line: Vec<Primitive<String>> => list("line"),
        city: Option<Primitive<String>> => opt("city"),
        district: Option<Primitive<String>> => opt("district"),
        state: Option<Primitive<String>> => opt("state"),
        postal_code: Option<Primitive<String>> => opt("postalCode"),
        country: Option<Primitive<String>> => opt("country"),
        period: Option<Period> => opt("period"),
    }
}

crate::fhir_element! {
    pub struct ContactPoint: "ContactPoint" {
        system: Option<Primitive<Code>> => opt("system"),
        value: Option<Primitive<String>> => opt("value"),
        use_: Option<Primitive<Code>> => opt("use"),
        rank: Option<Primitive<PositiveInt>> => opt("rank"),
        period: Option<Period> => opt("period"),
    }
}

crate::fhir_element! {
    /// Content in a format defined elsewhere.
    pub struct Attachment: "Attachment" {
        content_type: Option<Primitive<Code>> => opt("contentType"),
        language: Option<Primitive<Code>> => opt("language"),
        data: Option<Primitive<Base64Binary>> => opt("data"),
        url: Option<Primitive<Url>> => opt("url"),
        size: Option<Primitive<UnsignedInt>> => opt("size"),
        hash: Option<Primitive<Base64Binary>> => opt("hash"),
        title: Option<Primitive<String>> => opt("title"),
        creation: Option<Primitive<DateTime>> => opt("creation"),
    }
}

crate::fhir_choice! {
    pub enum AnnotationAuthor {
        Reference(Reference) = "Reference",
        String(Primitive<String>) = "String",
    }
}

crate::fhir_element! {
    /// Text note with attribution.
    pub struct Annotation: "Annotation" {
        author: Option<AnnotationAuthor> => choice("author"),
        time: Option<Primitive<DateTime>> => opt("time"),
        text: Primitive<Markdown> => required("text"),
    }
}

crate::fhir_element! {
    /// A series of measurements taken by a device.
    pub struct SampledData: "SampledData" {
        origin: Quantity => required("origin"),
        period: Primitive<Decimal> => required("period"),
        factor: Option<Primitive<Decimal>> => opt("factor"),
        lower_limit: Option<Primitive<Decimal>> => opt("lowerLimit"),
        upper_limit: Option<Primitive<Decimal>> => opt("upperLimit"),
        dimensions: Primitive<PositiveInt> => required("dimensions"),
        data: Option<Primitive<String>> => opt("data"),
    }
}

crate::fhir_element! {
    /// A digital signature along with supporting context.
    pub struct Signature: "Signature" {
        type_: Vec<Coding> => list("type"),
        when: Option<Primitive<Instant>> => opt("when"),
        who: Option<Reference> => opt("who"),
        on_behalf_of: Option<Reference> => opt("onBehalfOf"),
        target_format: Option<Primitive<Code>> => opt("targetFormat"),
        sig_format: Option<Primitive<Code>> => opt("sigFormat"),
        data: Option<Primitive<Base64Binary>> => opt("data"),
    }
}

crate::fhir_choice! {
    pub enum TimingBounds {
        Duration(Duration) = "Duration",
        Range(Range) = "Range",
        Period(Period) = "Period",
    }
}

crate::fhir_element! {
    /// When an event is to occur.
    pub struct TimingRepeat: "Timing.repeat" {
        bounds: Option<TimingBounds> => choice("bounds"),
        count: Option<Primitive<PositiveInt>> => opt("count"),
        count_max: Option<Primitive<PositiveInt>> => opt("countMax"),
        duration: Option<Primitive<Decimal>> => opt("duration"),
        duration_max: Option<Primitive<Decimal>> => opt("durationMax"),
        duration_unit: Option<Primitive<Code>> => opt("durationUnit"),
        frequency: Option<Primitive<PositiveInt>> => opt("frequency"),
        frequency_max: Option<Primitive<PositiveInt>> => opt("frequencyMax"),
        period: Option<Primitive<Decimal>> => opt("period"),
        period_max: Option<Primitive<Decimal>> => opt("periodMax"),
        period_unit: Option<Primitive<Code>> => opt("periodUnit"),
        day_of_week: Vec<Primitive<Code>> => list("dayOfWeek"),
        time_of_day: Vec<Primitive<Time>> => list("timeOfDay"),
        when: Vec<Primitive<Code>> => list("when"),
        offset: Option<Primitive<UnsignedInt>> => opt("offset"),
    }
}

crate::fhir_backbone! {
    /// An event that may occur multiple times.
    pub struct Timing: "Timing" {
        event: Vec<Primitive<DateTime>> => list("event"),
        repeat: Option<TimingRepeat> => opt("repeat"),
        code: Option<CodeableConcept> => opt("code"),
    }
}

crate::fhir_element! {
    pub struct ContactDetail: "ContactDetail" {
        name: Option<Primitive<String>> => opt("name"),
        telecom: Vec<ContactPoint> => list("telecom"),
    }
}

crate::fhir_element! {
    pub struct Expression: "Expression" {
        description: Option<Primitive<String>> => opt("description"),
        name: Option<Primitive<Id>> => opt("name"),
        language: Primitive<Code> => required("language"),
        expression: Option<Primitive<String>> => opt("expression"),
        reference: Option<Primitive<Uri>> => opt("reference"),
    }
}

crate::fhir_choice! {
    pub enum UsageContextValue {
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        Quantity(Quantity) = "Quantity",
        Range(Range) = "Range",
        Reference(Reference) = "Reference",
    }
}

crate::fhir_element! {
    pub struct UsageContext: "UsageContext" {
        code: Coding => required("code"),
        value: Option<UsageContextValue> => required_choice("value"),
    }
}

crate::fhir_element! {
    /// Metadata about a resource.
    pub struct Meta: "Meta" {
        version_id: Option<Primitive<Id>> => opt("versionId"),
        last_updated: Option<Primitive<Instant>> => opt("lastUpdated"),
        source: Option<Primitive<Uri>> => opt("source"),
        profile: Vec<Primitive<Canonical>> => list("profile"),
        security: Vec<Coding> => list("security"),
        tag: Vec<Coding> => list("tag"),
    }
}

impl Meta {
    pub fn has_profile(&self, profile: &str) -> bool {
        self.profile.iter().any(|p| p.as_str() == Some(profile))
    }
}

crate::fhir_element! {
    /// Human-readable summary of a resource.
    pub struct Narrative: "Narrative" {
        status: Primitive<Code> => required("status"),
        div: Primitive<Xhtml> => required("div"),
    }
}

crate::fhir_choice! {
    /// Any datatype allowed in an open `value[x]` slot.
    pub enum DataValue {
        Base64Binary(Primitive<Base64Binary>) = "Base64Binary",
        Boolean(Primitive<bool>) = "Boolean",
        Canonical(Primitive<Canonical>) = "Canonical",
        Code(Primitive<Code>) = "Code",
        Date(Primitive<Date>) = "Date",
        DateTime(Primitive<DateTime>) = "DateTime",
        Decimal(Primitive<Decimal>) = "Decimal",
        Id(Primitive<Id>) = "Id",
        Instant(Primitive<Instant>) = "Instant",
        Integer(Primitive<i32>) = "Integer",
        Markdown(Primitive<Markdown>) = "Markdown",
        Oid(Primitive<Oid>) = "Oid",
        PositiveInt(Primitive<PositiveInt>) = "PositiveInt",
        String(Primitive<String>) = "String",
        Time(Primitive<Time>) = "Time",
        UnsignedInt(Primitive<UnsignedInt>) = "UnsignedInt",
        Uri(Primitive<Uri>) = "Uri",
        Url(Primitive<Url>) = "Url",
        Uuid(Primitive<Uuid>) = "Uuid",
        Address(Address) = "Address",
        Age(Age) = "Age",
        Annotation(Annotation) = "Annotation",
        Attachment(Attachment) = "Attachment",
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        Coding(Coding) = "Coding",
        ContactPoint(ContactPoint) = "ContactPoint",
        Count(Count) = "Count",
        Distance(Distance) = "Distance",
        Duration(Duration) = "Duration",
        HumanName(HumanName) = "HumanName",
        Identifier(Identifier) = "Identifier",
        Money(Money) = "Money",
        Period(Period) = "Period",
        Quantity(Quantity) = "Quantity",
        Range(Range) = "Range",
        Ratio(Ratio) = "Ratio",
        Reference(Reference) = "Reference",
        SampledData(SampledData) = "SampledData",
        Signature(Signature) = "Signature",
        Timing(Timing) = "Timing",
        ContactDetail(ContactDetail) = "ContactDetail",
        Expression(Expression) = "Expression",
        UsageContext(UsageContext) = "UsageContext",
        Meta(Meta) = "Meta",
    }
}

impl DataValue {
    /// The string content of string-like primitive variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Base64Binary(p) => p.as_str(),
            DataValue::Canonical(p) => p.as_str(),
            DataValue::Code(p) => p.as_str(),
            DataValue::Date(p) => p.as_str(),
            DataValue::DateTime(p) => p.as_str(),
            DataValue::Id(p) => p.as_str(),
            DataValue::Instant(p) => p.as_str(),
            DataValue::Markdown(p) => p.as_str(),
            DataValue::Oid(p) => p.as_str(),
            DataValue::String(p) => p.as_str(),
            DataValue::Time(p) => p.as_str(),
            DataValue::Uri(p) => p.as_str(),
            DataValue::Url(p) => p.as_str(),
            DataValue::Uuid(p) => p.as_str(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Boolean(p) => p.value,
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DataValue::Integer(p) => p.value.map(i64::from),
            DataValue::PositiveInt(p) => p.value.map(|v| i64::from(v.get())),
            DataValue::UnsignedInt(p) => p.value.map(|v| i64::from(v.get())),
            _ => None,
        }
    }

    /// FHIR type name of the populated variant.
    pub fn type_name(&self) -> &'static str {
        use crate::choice::FhirChoice;
        match self {
            DataValue::Base64Binary(_) => "base64Binary",
            DataValue::Boolean(_) => "boolean",
            DataValue::Canonical(_) => "canonical",
            DataValue::Code(_) => "code",
            DataValue::Date(_) => "date",
            DataValue::DateTime(_) => "dateTime",
            DataValue::Decimal(_) => "decimal",
            DataValue::Id(_) => "id",
            DataValue::Instant(_) => "instant",
            DataValue::Integer(_) => "integer",
            DataValue::Markdown(_) => "markdown",
            DataValue::Oid(_) => "oid",
            DataValue::PositiveInt(_) => "positiveInt",
            DataValue::String(_) => "string",
            DataValue::Time(_) => "time",
            DataValue::UnsignedInt(_) => "unsignedInt",
            DataValue::Uri(_) => "uri",
            DataValue::Url(_) => "url",
            DataValue::Uuid(_) => "uuid",
            complex => complex.suffix(),
        }
    }
}
