//! IO boundaries: CSV intake and reporting for the CLI driver.

pub mod csv;
