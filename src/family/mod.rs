mod document;
mod edit;
mod model;

pub use document::{
    ImportError, export_dataset, import_dataset, read_dataset_file, write_dataset_file,
};
pub use edit::EditError;
pub use model::{ChildLink, Dataset, Person, Sex, Union};

const SAMPLE_DOCUMENT: &str = include_str!("../../assets/ptolemies.json");

pub fn sample_dataset() -> Result<Dataset, ImportError> {
    import_dataset(SAMPLE_DOCUMENT)
}
