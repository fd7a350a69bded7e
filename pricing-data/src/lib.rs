//! CSV interchange for cost structures.

pub mod codec;
pub mod cost_csv;
pub mod reader;
pub mod sample;

pub use codec::{CsvCodecError, CsvTable, CsvValue, decode_csv};
pub use cost_csv::{
    CostImport, CsvImportError, FileSettings, encode_cost_structure, import_cost_data, parse_cost_data_from_csv,
};
pub use reader::{read_cost_data, read_cost_data_from_file};
