pub mod attribution;
pub mod classification;
pub mod confusion;
pub mod curves;
pub mod drift;
pub mod quality;
pub mod training;
