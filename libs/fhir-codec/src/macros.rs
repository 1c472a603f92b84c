//! Macros for declaring catalog types
//!
//! Each catalog type is declared once as a list of fields. A field reads
//!
//! ```text
//! name: Type => mode("jsonKey")
//! ```
//!
//! where `mode` is one of the [`ObjectReader`](crate::ObjectReader) /
//! [`ObjectWriter`](crate::ObjectWriter) methods: `opt`, `required`,
//! `list`, `choice`, `required_choice`, `attr` or `required_attr`. The
//! macros generate the struct, its decode and encode in declaration order,
//! and the accessor trait impls.
//!
//! # Usage
//! ```rust,ignore
//! use ferrum_codec::{fhir_element, Primitive, Code, Uri};
//!
//! fhir_element! {
//!     /// A reference to a code defined by a terminology system.
//!     pub struct Coding: "Coding" {
//!         system: Option<Primitive<Uri>> => opt("system"),
//!         code: Option<Primitive<Code>> => opt("code"),
//!     }
//! }
//! ```

/// Implement [`FhirValue`](crate::FhirValue) for types that already
/// implement [`FhirComplex`](crate::FhirComplex).
#[macro_export]
macro_rules! impl_complex_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FhirValue for $ty {
                fn decode_value(
                    value: ::std::option::Option<&$crate::__private::Value>,
                    sidecar: ::std::option::Option<&$crate::__private::Value>,
                    ctx: &mut $crate::DecodeContext<'_>,
                ) -> ::std::result::Result<::std::option::Option<Self>, $crate::DecodeError> {
                    $crate::decode_complex(value, sidecar, ctx)
                }

                fn encode_value(&self) -> $crate::Encoded {
                    $crate::encode_complex(self)
                }
            }
        )+
    };
}

/// Declare a complex datatype deriving from `Element`.
#[macro_export]
macro_rules! fhir_element {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $type_name:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $fty:ty => $mode:ident($key:literal)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            pub element: $crate::Element,
            $( $(#[$fmeta])* pub $field: $fty, )*
        }

        impl $crate::FhirComplex for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn decode_fields(
                reader: &mut $crate::ObjectReader<'_, '_, '_>,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let element = <$crate::Element as $crate::FhirComplex>::decode_fields(reader)?;
                $( let $field = reader.$mode($key)?; )*
                ::std::result::Result::Ok(Self { element, $($field,)* })
            }

            fn encode_fields(&self, writer: &mut $crate::ObjectWriter) {
                <$crate::Element as $crate::FhirComplex>::encode_fields(&self.element, writer);
                $( writer.$mode($key, &self.$field); )*
            }
        }

        $crate::impl_complex_value!($name);

        impl $crate::HasId for $name {
            fn id(&self) -> ::std::option::Option<&str> {
                self.element.id.as_deref()
            }

            fn set_id(&mut self, id: ::std::option::Option<::std::string::String>) {
                self.element.id = id;
            }
        }

        impl $crate::HasExtensions for $name {
            fn extensions(&self) -> &[$crate::Extension] {
                &self.element.extension
            }

            fn extensions_mut(&mut self) -> &mut ::std::vec::Vec<$crate::Extension> {
                &mut self.element.extension
            }
        }
    };
}

/// Declare an element deriving from `BackboneElement`. `$type_name` is the
/// element path (`Patient.contact`).
#[macro_export]
macro_rules! fhir_backbone {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $type_name:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $fty:ty => $mode:ident($key:literal)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            pub backbone: $crate::BackboneElement,
            $( $(#[$fmeta])* pub $field: $fty, )*
        }

        impl $crate::FhirComplex for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn decode_fields(
                reader: &mut $crate::ObjectReader<'_, '_, '_>,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let backbone = $crate::BackboneElement::decode_fields(reader)?;
                $( let $field = reader.$mode($key)?; )*
                ::std::result::Result::Ok(Self { backbone, $($field,)* })
            }

            fn encode_fields(&self, writer: &mut $crate::ObjectWriter) {
                self.backbone.encode_fields(writer);
                $( writer.$mode($key, &self.$field); )*
            }
        }

        $crate::impl_complex_value!($name);

        impl $crate::HasId for $name {
            fn id(&self) -> ::std::option::Option<&str> {
                self.backbone.element.id.as_deref()
            }

            fn set_id(&mut self, id: ::std::option::Option<::std::string::String>) {
                self.backbone.element.id = id;
            }
        }

        impl $crate::HasExtensions for $name {
            fn extensions(&self) -> &[$crate::Extension] {
                &self.backbone.element.extension
            }

            fn extensions_mut(&mut self) -> &mut ::std::vec::Vec<$crate::Extension> {
                &mut self.backbone.element.extension
            }
        }

        impl $crate::HasModifierExtensions for $name {
            fn modifier_extensions(&self) -> &[$crate::Extension] {
                &self.backbone.modifier_extension
            }

            fn modifier_extensions_mut(&mut self) -> &mut ::std::vec::Vec<$crate::Extension> {
                &mut self.backbone.modifier_extension
            }
        }
    };
}

/// Declare a resource.
///
/// `domain` resources derive from `DomainResource` (narrative, contained
/// resources, extensions); `resource` ones derive from `Resource` directly
/// (`Bundle`, `Parameters`, `Binary`).
#[macro_export]
macro_rules! fhir_resource {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : domain $rt:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $fty:ty => $mode:ident($key:literal)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            pub domain: $crate::DomainResourceBase,
            $( $(#[$fmeta])* pub $field: $fty, )*
        }

        impl $crate::FhirComplex for $name {
            const TYPE_NAME: &'static str = $rt;

            fn decode_fields(
                reader: &mut $crate::ObjectReader<'_, '_, '_>,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                reader.discriminator($rt)?;
                let domain = $crate::DomainResourceBase::decode_fields(reader)?;
                $( let $field = reader.$mode($key)?; )*
                ::std::result::Result::Ok(Self { domain, $($field,)* })
            }

            fn encode_fields(&self, writer: &mut $crate::ObjectWriter) {
                writer.discriminator($rt);
                self.domain.encode_fields(writer);
                $( writer.$mode($key, &self.$field); )*
            }
        }

        $crate::__resource_impls!($name, $rt);

        impl $crate::Resource for $name {
            fn resource_type(&self) -> &str {
                $rt
            }

            fn id(&self) -> ::std::option::Option<&str> {
                self.domain.resource.id()
            }

            fn meta(&self) -> ::std::option::Option<&$crate::Meta> {
                self.domain.resource.meta.as_ref()
            }

            fn contained(&self) -> &[$crate::AnyResource] {
                &self.domain.contained
            }

            $crate::__resource_dyn_methods!();
        }

        impl $crate::HasExtensions for $name {
            fn extensions(&self) -> &[$crate::Extension] {
                &self.domain.extension
            }

            fn extensions_mut(&mut self) -> &mut ::std::vec::Vec<$crate::Extension> {
                &mut self.domain.extension
            }
        }

        impl $crate::HasModifierExtensions for $name {
            fn modifier_extensions(&self) -> &[$crate::Extension] {
                &self.domain.modifier_extension
            }

            fn modifier_extensions_mut(&mut self) -> &mut ::std::vec::Vec<$crate::Extension> {
                &mut self.domain.modifier_extension
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : resource $rt:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $fty:ty => $mode:ident($key:literal)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            pub resource: $crate::ResourceBase,
            $( $(#[$fmeta])* pub $field: $fty, )*
        }

        impl $crate::FhirComplex for $name {
            const TYPE_NAME: &'static str = $rt;

            fn decode_fields(
                reader: &mut $crate::ObjectReader<'_, '_, '_>,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                reader.discriminator($rt)?;
                let resource = $crate::ResourceBase::decode_fields(reader)?;
                $( let $field = reader.$mode($key)?; )*
                ::std::result::Result::Ok(Self { resource, $($field,)* })
            }

            fn encode_fields(&self, writer: &mut $crate::ObjectWriter) {
                writer.discriminator($rt);
                self.resource.encode_fields(writer);
                $( writer.$mode($key, &self.$field); )*
            }
        }

        $crate::__resource_impls!($name, $rt);

        impl $crate::Resource for $name {
            fn resource_type(&self) -> &str {
                $rt
            }

            fn id(&self) -> ::std::option::Option<&str> {
                self.resource.id()
            }

            fn meta(&self) -> ::std::option::Option<&$crate::Meta> {
                self.resource.meta.as_ref()
            }

            $crate::__resource_dyn_methods!();
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __resource_impls {
    ($name:ident, $rt:literal) => {
        $crate::impl_complex_value!($name);

        impl $crate::ResourceType for $name {
            const RESOURCE_TYPE: &'static str = $rt;
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __resource_dyn_methods {
    () => {
        fn to_json(&self) -> $crate::__private::Map<::std::string::String, $crate::__private::Value> {
            $crate::encode_object(self)
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
            self
        }

        fn clone_boxed(&self) -> ::std::boxed::Box<dyn $crate::Resource> {
            ::std::boxed::Box::new(::std::clone::Clone::clone(self))
        }

        fn eq_dyn(&self, other: &dyn $crate::Resource) -> bool {
            other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|other| other == self)
        }
    };
}

/// Declare a choice-type enum. Each variant names its type suffix:
///
/// ```rust,ignore
/// fhir_choice! {
///     pub enum DeceasedChoice {
///         Boolean(Primitive<bool>) = "Boolean",
///         DateTime(Primitive<DateTime>) = "DateTime",
///     }
/// }
/// ```
#[macro_export]
macro_rules! fhir_choice {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty) = $suffix:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty), )+
        }

        impl $crate::FhirChoice for $name {
            const SUFFIXES: &'static [&'static str] = &[$($suffix),+];

            fn decode_variant(
                reader: &mut $crate::ObjectReader<'_, '_, '_>,
                key: &str,
                suffix: &str,
            ) -> ::std::result::Result<::std::option::Option<Self>, $crate::DecodeError> {
                match suffix {
                    $( $suffix => ::std::result::Result::Ok(reader.opt::<$ty>(key)?.map($name::$variant)), )+
                    _ => ::std::result::Result::Ok(::std::option::Option::None),
                }
            }

            fn suffix(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => $suffix, )+
                }
            }

            fn encode_variant(&self, writer: &mut $crate::ObjectWriter, base: &str) {
                let key = $crate::FhirChoice::key(self, base);
                match self {
                    $( $name::$variant(value) => writer.required(&key, value), )+
                }
            }
        }
    };
}
