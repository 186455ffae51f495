use jiff::civil::Date;

/// The aux region: the small sub-record a user can rewrite without touching
/// the main region, sized to fit pre-reserved padding on the tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxRegion {
    /// Material consumed so far, in grams.
    pub consumed_weight: Option<f32>,
    pub workgroup: Option<String>,
    pub user_note: Option<String>,
    pub last_stir_time: Option<Date>,
}

impl AuxRegion {
    /// True when no field would make it onto the wire. An empty aux region
    /// is omitted from the tag entirely rather than written as an empty map.
    pub fn is_empty(&self) -> bool {
        self.consumed_weight.is_none()
            && self.workgroup.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.user_note.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.last_stir_time.is_none()
    }
}
