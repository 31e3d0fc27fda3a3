/// Relationship ID mapper for tracking relationships during slide generation.
///
/// Relationships are created first; the mapper then hands the actual ids to
/// the XML writer. Images and charts are keyed by their order of appearance
/// on the slide, which is the order the writer visits them in.
use std::collections::HashMap;

/// Maps the images and charts of one slide to their relationship IDs.
#[derive(Debug, Default)]
pub struct RelationshipMapper {
    /// Image index on the slide to relationship ID
    image_ids: HashMap<usize, String>,
    /// Chart index on the slide to relationship ID
    chart_ids: HashMap<usize, String>,
}

impl RelationshipMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image relationship mapping.
    ///
    /// # Arguments
    /// * `image_index` - The index of the image within the slide (0-based)
    /// * `rel_id` - The relationship ID (e.g., "rId2")
    pub fn add_image(&mut self, image_index: usize, rel_id: String) {
        self.image_ids.insert(image_index, rel_id);
    }

    /// Add a chart relationship mapping.
    pub fn add_chart(&mut self, chart_index: usize, rel_id: String) {
        self.chart_ids.insert(chart_index, rel_id);
    }

    /// Get the relationship ID for an image.
    pub fn get_image_id(&self, image_index: usize) -> Option<&str> {
        self.image_ids.get(&image_index).map(|s| s.as_str())
    }

    /// Get the relationship ID for a chart.
    pub fn get_chart_id(&self, chart_index: usize) -> Option<&str> {
        self.chart_ids.get(&chart_index).map(|s| s.as_str())
    }
}
