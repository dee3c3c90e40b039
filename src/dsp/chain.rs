//! Processing chain
//!
//! Stages run in a fixed order:
//! 1. Fade (shape the edges of the raw crop)
//! 2. Normalize (so the faded result still peaks at full scale)

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dsp::fade::Fade;
use crate::dsp::normalize::PeakNormalize;
use crate::dsp::processor::Processor;

/// Which optional stages run on every export from a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingFlags {
    /// Apply the 20ms linear fade-in/out
    pub fade: bool,
    /// Peak-normalize before quantization
    pub normalize: bool,
}

impl ProcessingFlags {
    pub fn new(fade: bool, normalize: bool) -> Self {
        Self { fade, normalize }
    }
}

/// Ordered list of stages applied to a cropped selection
pub struct ProcessingChain {
    processors: Vec<Box<dyn Processor>>,
}

impl ProcessingChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Build the chain enabled by `flags`
    pub fn from_flags(flags: ProcessingFlags) -> Self {
        let mut chain = Self::new();
        if flags.normalize {
            chain.add(Box::new(PeakNormalize));
        }
        if flags.fade {
            chain.add(Box::new(Fade));
        }
        chain
    }

    /// Insert a processor at its position in the fixed order
    pub fn add(&mut self, processor: Box<dyn Processor>) {
        let position = processor.position();
        let index = self
            .processors
            .iter()
            .position(|p| p.position() > position)
            .unwrap_or(self.processors.len());
        self.processors.insert(index, processor);
    }

    /// Run every stage in order
    pub fn process(&self, samples: &mut [f32], sample_rate: u32) {
        for processor in &self.processors {
            debug!("{} over {} samples", processor.display_name(), samples.len());
            processor.process(samples, sample_rate);
        }
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor type identifiers in processing order
    pub fn processor_types(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.processor_type()).collect()
    }
}

impl Default for ProcessingChain {
    fn default() -> Self {
        Self::new()
    }
}
