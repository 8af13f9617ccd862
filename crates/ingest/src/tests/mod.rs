//! Cross-stage tests for the chunking pipeline and batch driver.
