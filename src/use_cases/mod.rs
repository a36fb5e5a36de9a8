// Use cases layer: patient workflows behind the service port.

pub mod patients;

#[cfg(test)]
pub(crate) mod test_support;

pub use patients::PatientUseCases;
