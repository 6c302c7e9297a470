//! Structured Embedder
//!
//! Converts payload fields into a single composite vector based on the similarity schema.
//! This enables vector search over structured/tabular data without requiring external embeddings.

use crate::schema::{SimilaritySchema, FieldType};
use crate::distance::{hash_text_to_vector, hash_categorical_to_vector};
use distx_core::Vector;
use serde_json::Value;

/// Default dimension for text embeddings
pub const DEFAULT_TEXT_DIM: usize = 64;

/// Default dimension for categorical embeddings
pub const DEFAULT_CATEGORICAL_DIM: usize = 64;

/// Structured embedder that converts payloads to vectors based on schema
#[derive(Debug, Clone)]
pub struct StructuredEmbedder {
    schema: SimilaritySchema,
    text_dim: usize,
    categorical_dim: usize,
}

impl StructuredEmbedder {
    /// Create a new structured embedder with the given schema
    pub fn new(schema: SimilaritySchema) -> Self {
        Self {
            schema,
            text_dim: DEFAULT_TEXT_DIM,
            categorical_dim: DEFAULT_CATEGORICAL_DIM,
        }
    }

    /// Create embedder with custom dimensions
    pub fn with_dimensions(schema: SimilaritySchema, text_dim: usize, categorical_dim: usize) -> Self {
        Self {
            schema,
            text_dim,
            categorical_dim,
        }
    }

    /// Get the total vector dimension for this embedder
    pub fn vector_dim(&self) -> usize {
        use crate::schema::FieldType;
        self.schema.fields.values().map(|config| {
            match config.field_type {
                FieldType::Text => self.text_dim,
                FieldType::Number => 1,
                FieldType::Categorical => self.categorical_dim,
                FieldType::Boolean => 1,
            }
        }).sum()
    }

    /// Get a reference to the schema
    pub fn schema(&self) -> &SimilaritySchema {
        &self.schema
    }

    /// Convert a payload to a composite vector
    /// 
    /// The vector is constructed by:
    /// 1. Iterating through schema fields in sorted order
    /// 2. Extracting values from the payload
    /// 3. Embedding each field according to its type
    /// 4. Applying weights
    /// 5. Concatenating all embeddings
    pub fn embed(&self, payload: &Value) -> Vector {
        let mut components: Vec<f32> = Vec::with_capacity(self.vector_dim());
        
        // Process fields in sorted order for consistency
        for field_name in self.schema.sorted_field_names() {
            let config = self.schema.get_field(field_name).unwrap();
            let weight_sqrt = config.weight.sqrt(); // Apply sqrt of weight to vector
            
            let field_vector = self.embed_field(payload, field_name, config);
            
            // Apply weight and extend
            components.extend(field_vector.iter().map(|v| v * weight_sqrt));
        }
        
        // Create and normalize the vector
        let mut vector = Vector::new(components);
        vector.normalize();
        vector
    }

    /// Embed a single field from the payload
    fn embed_field(&self, payload: &Value, field_name: &str, config: &crate::schema::FieldConfig) -> Vec<f32> {
        let value = payload.get(field_name);
        
        match config.field_type {
            FieldType::Text => self.embed_text(value),
            FieldType::Number => self.embed_number(value),
            FieldType::Categorical => self.embed_categorical(value),
            FieldType::Boolean => self.embed_boolean(value),
        }
    }

    /// Embed a text field
    fn embed_text(&self, value: Option<&Value>) -> Vec<f32> {
        match value.and_then(|v| v.as_str()) {
            Some(text) => hash_text_to_vector(text, self.text_dim),
            None => vec![0.0; self.text_dim], // Missing field gets zero vector
        }
    }

    /// Embed a number field
    fn embed_number(&self, value: Option<&Value>) -> Vec<f32> {
        match value {
            Some(v) => {
                let num = v.as_f64().unwrap_or(0.0);
                // Normalize using sigmoid-like function for unbounded values
                let normalized = num.tanh() as f32;
                vec![normalized]
            }
            None => vec![0.0], // Missing field
        }
    }

    /// Embed a categorical field
    fn embed_categorical(&self, value: Option<&Value>) -> Vec<f32> {
        match value.and_then(|v| v.as_str()) {
            Some(category) => hash_categorical_to_vector(category, self.categorical_dim),
            None => vec![0.0; self.categorical_dim],
        }
    }

    /// Embed a boolean field
    fn embed_boolean(&self, value: Option<&Value>) -> Vec<f32> {
        match value.and_then(|v| v.as_bool()) {
            Some(true) => vec![1.0],
            Some(false) => vec![-1.0],
            None => vec![0.0],
        }
    }
}

/// Builder for creating StructuredEmbedder with custom options
#[derive(Debug, Clone)]
pub struct EmbedderBuilder {
    schema: SimilaritySchema,
    text_dim: usize,
    categorical_dim: usize,
}

impl EmbedderBuilder {
    pub fn new(schema: SimilaritySchema) -> Self {
        Self {
            schema,
            text_dim: DEFAULT_TEXT_DIM,
            categorical_dim: DEFAULT_CATEGORICAL_DIM,
        }
    }

    pub fn text_dim(mut self, dim: usize) -> Self {
        self.text_dim = dim;
        self
    }

    pub fn categorical_dim(mut self, dim: usize) -> Self {
        self.categorical_dim = dim;
        self
    }

    pub fn build(self) -> StructuredEmbedder {
        StructuredEmbedder::with_dimensions(self.schema, self.text_dim, self.categorical_dim)
    }
}
