//! FHIR Parameters model

use ferrum_codec::{fhir_backbone, fhir_resource, AnyResource, DataValue, Primitive};

fhir_backbone! {
    /// Operation Parameter
    pub struct ParametersParameter: "Parameters.parameter" {
        /// Name from the definition
        name: Primitive<String> => required("name"),
        /// If parameter is a data type
        value: Option<DataValue> => choice("value"),
        /// If parameter is a whole resource
        resource: Option<AnyResource> => opt("resource"),
        /// Named part of a multi-part parameter
        part: Vec<ParametersParameter> => list("part"),
    }
}

fhir_resource! {
    /// FHIR Parameters resource
    ///
    /// Operation request or response parameters.
    pub struct Parameters: resource "Parameters" {
        parameter: Vec<ParametersParameter> => list("parameter"),
    }
}

impl ParametersParameter {
    pub fn name(&self) -> Option<&str> {
        self.name.as_str()
    }

    /// First part with the given name.
    pub fn part(&self, name: &str) -> Option<&ParametersParameter> {
        self.part.iter().find(|p| p.name() == Some(name))
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// First parameter with the given name.
    pub fn get(&self, name: &str) -> Option<&ParametersParameter> {
        self.parameter.iter().find(|p| p.name() == Some(name))
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParametersParameter> {
        self.parameter.iter().filter(move |p| p.name() == Some(name))
    }

    /// Value of the first parameter with the given name.
    pub fn value(&self, name: &str) -> Option<&DataValue> {
        self.get(name).and_then(|p| p.value.as_ref())
    }

    pub fn add_value(&mut self, name: &str, value: DataValue) {
        self.parameter.push(ParametersParameter {
            name: Primitive::from(name),
            value: Some(value),
            ..Default::default()
        });
    }

    pub fn add_resource(&mut self, name: &str, resource: AnyResource) {
        self.parameter.push(ParametersParameter {
            name: Primitive::from(name),
            resource: Some(resource),
            ..Default::default()
        });
    }
}
