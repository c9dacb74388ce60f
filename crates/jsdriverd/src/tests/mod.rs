//! Test suites for the JavaScript parse driver.

mod support;
