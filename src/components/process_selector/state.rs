/// Picker input that lives only in the widget; the filtered names live in the model.
#[derive(Default)]
pub struct ProcessSelector {
    pub search: String,
}
