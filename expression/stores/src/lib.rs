/// Stores are for loading/storing experiments and the files that feed them.
///
/// Currently, all stores are just simple files: CSV for vocabularies and sample sheets, JSON for experiments
/// and the tab-delimited design file format for exported designs.
pub mod csv;
pub mod design_writer;
pub mod experiments;
pub mod samples;
pub mod vocabulary;

// FUTURE Ideally we want to include this module ONLY for integration tests or for unit tests
//        but when compiling for integration tests, `test` is NOT defined so we cannot use
//        just `#[cfg(test)]`
#[cfg(any(test, feature = "testing"))]
pub mod test;
