pub mod routine;
