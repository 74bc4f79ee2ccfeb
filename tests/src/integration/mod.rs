//! Cross-subsystem integration tests.

#[cfg(test)]
mod harness;

#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod flows;
