#[cfg(test)]
pub mod booking;
