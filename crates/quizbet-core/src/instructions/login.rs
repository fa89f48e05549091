use crate::{
    require,
    state::{Student, UserDirectory},
    Error,
};

pub fn authenticate_handler(
    users: &UserDirectory,
    student_id: &str,
    name: &str,
    password: &str,
) -> crate::Result<Student> {
    users
        .authenticate(student_id, name, password)
        .ok_or(Error::LoginFailed)
}

/// Plaintext comparison against the configured admin password.
pub fn verify_admin_password(expected: &str, given: &str) -> crate::Result<()> {
    require!(expected == given, Error::AdminLoginFailed);
    Ok(())
}
