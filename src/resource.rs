//! Model registration: how the host runtime finds and builds resources.
//!
//! A [`Registry`] maps a [`Model`] triple (`namespace:family:name`) to a
//! validate function and a constructor. Registration is an explicit call
//! made once during process start-up, see [`register_apds9960`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{ClockPort, DriverFactory};
use crate::app::service::Apds9960Sensor;
use crate::config::Attributes;
use crate::error::{Error, RegistryError, Result};

/// Model identifier of this sensor resource.
pub const APDS9960_MODEL: Model = Model::from_static("hipsterbrown", "sensor", "apds9960");

// ───────────────────────────────────────────────────────────────
// Model identifiers
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelFamily {
    pub namespace: Cow<'static, str>,
    pub family: Cow<'static, str>,
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.family)
    }
}

/// A `namespace:family:name` model triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Model {
    pub family: ModelFamily,
    pub name: Cow<'static, str>,
}

impl Model {
    pub const fn from_static(namespace: &'static str, family: &'static str, name: &'static str) -> Self {
        Self {
            family: ModelFamily {
                namespace: Cow::Borrowed(namespace),
                family: Cow::Borrowed(family),
            },
            name: Cow::Borrowed(name),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.name)
    }
}

/// The string was not a `namespace:family:name` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParseError(pub String);

impl fmt::Display for ModelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid model triple '{}'", self.0)
    }
}

impl std::error::Error for ModelParseError {}

impl FromStr for Model {
    type Err = ModelParseError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(family), Some(name), None)
                if !ns.is_empty() && !family.is_empty() && !name.is_empty() =>
            {
                Ok(Self {
                    family: ModelFamily {
                        namespace: Cow::Owned(ns.to_owned()),
                        family: Cow::Owned(family.to_owned()),
                    },
                    name: Cow::Owned(name.to_owned()),
                })
            }
            _ => Err(ModelParseError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Model {
    type Error = ModelParseError;

    fn try_from(s: String) -> core::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Model> for String {
    fn from(m: Model) -> Self {
        m.to_string()
    }
}

// ───────────────────────────────────────────────────────────────
// Component configuration
// ───────────────────────────────────────────────────────────────

/// One component entry from the machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    pub model: Model,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>, model: Model, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            model,
            attributes,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Registry
// ───────────────────────────────────────────────────────────────

/// Validates a config and returns its implicit dependency names.
pub type ValidateFn = fn(&ComponentConfig) -> Result<Vec<String>>;

type ConstructFn<R> = Box<dyn Fn(&ComponentConfig, &[String]) -> Result<R>>;

struct Registration<R> {
    validate: ValidateFn,
    construct: ConstructFn<R>,
}

/// Model → (validate, construct) table.
pub struct Registry<R> {
    models: HashMap<Model, Registration<R>>,
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Registry<R> {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Register a model. Each model may be registered once.
    pub fn register(
        &mut self,
        model: Model,
        validate: ValidateFn,
        construct: impl Fn(&ComponentConfig, &[String]) -> Result<R> + 'static,
    ) -> Result<()> {
        if self.models.contains_key(&model) {
            return Err(RegistryError::DuplicateModel(model.to_string()).into());
        }
        info!("registered model {}", model);
        self.models.insert(
            model,
            Registration {
                validate,
                construct: Box::new(construct),
            },
        );
        Ok(())
    }

    pub fn is_registered(&self, model: &Model) -> bool {
        self.models.contains_key(model)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.keys()
    }

    /// Validate `config` with its model's validator.
    pub fn validate(&self, config: &ComponentConfig) -> Result<Vec<String>> {
        (self.lookup(&config.model)?.validate)(config)
    }

    /// Build and configure a resource for `config`.
    pub fn create(&self, config: &ComponentConfig, dependencies: &[String]) -> Result<R> {
        (self.lookup(&config.model)?.construct)(config, dependencies)
    }

    fn lookup(&self, model: &Model) -> Result<&Registration<R>> {
        self.models
            .get(model)
            .ok_or_else(|| Error::from(RegistryError::UnknownModel(model.to_string())))
    }
}

/// Register the APDS9960 model.
///
/// `make_factory` is called once per created resource; the new resource is
/// reconfigured from its config before it is returned.
pub fn register_apds9960<F, C>(
    registry: &mut Registry<Apds9960Sensor<F, C>>,
    make_factory: impl Fn() -> F + 'static,
) -> Result<()>
where
    F: DriverFactory + 'static,
    C: ClockPort + Default + 'static,
{
    registry.register(
        APDS9960_MODEL,
        Apds9960Sensor::<F, C>::validate_config,
        move |config, dependencies| {
            let mut sensor = Apds9960Sensor::new(config.name.clone(), make_factory(), C::default());
            sensor.reconfigure(config, dependencies)?;
            Ok(sensor)
        },
    )
}
