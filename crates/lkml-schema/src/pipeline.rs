//! Decorator chains in front of a consumer.
//!
//! A [`Pipeline`] says which decorators sit between the parser and a
//! consumer sink: schema validation first, then event logging, so the log
//! shows exactly what the consumer receives.

use lkml_parse::{EventLogger, ObjectEvents, ParseError};
use tracing::debug;

use crate::types::Schema;
use crate::validate::{ErrorHandler, ValidatingHandler};

/// Configuration of the handler chain for one schema.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'s> {
    schema: &'s Schema,
    logging: bool,
    validating: bool,
}

impl<'s> Pipeline<'s> {
    /// A validating pipeline without logging.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            logging: false,
            validating: true,
        }
    }

    /// Log every event the consumer receives at `debug` level.
    pub fn logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Check events against the schema before they reach the consumer.
    pub fn validating(mut self, validating: bool) -> Self {
        self.validating = validating;
        self
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Wrap `sink` in the configured decorators. `errors` only receives
    /// anything when validation is on.
    pub fn assemble<'a>(
        &self,
        sink: Box<dyn ObjectEvents + 'a>,
        errors: &'a mut dyn ErrorHandler,
    ) -> Box<dyn ObjectEvents + 'a>
    where
        's: 'a,
    {
        debug!(
            schema = self.schema.name(),
            logging = self.logging,
            validating = self.validating,
            "assembling pipeline"
        );
        let sink: Box<dyn ObjectEvents + 'a> = if self.logging {
            Box::new(EventLogger::new(sink))
        } else {
            sink
        };
        if self.validating {
            Box::new(ValidatingHandler::new(self.schema, sink, errors))
        } else {
            sink
        }
    }

    /// Parse `source` with the schema's code properties through the chain
    /// into `sink`. `sink` is closed at the end.
    pub fn run<'a>(
        &self,
        source: &str,
        sink: Box<dyn ObjectEvents + 'a>,
        errors: &'a mut dyn ErrorHandler,
    ) -> Result<(), ParseError>
    where
        's: 'a,
    {
        self.schema.parser(source).parse(self.assemble(sink, errors))
    }
}
