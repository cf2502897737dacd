use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::{info, warn};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService {
    repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    registration_enabled: bool,
}

impl AuthService {
    const DUMMY_PASSWORD_HASH: &'static str =
        "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(
        repo: Arc<dyn UserRepository>,
        jwt: Arc<JwtService>,
        registration_enabled: bool,
    ) -> Self {
        Self {
            repo,
            jwt,
            registration_enabled,
        }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        if !self.registration_enabled {
            return Err(DomainError::Forbidden("registration is disabled"));
        }
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                email: req.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "user registered");
        let access_token = self.issue_token(&user)?;
        Ok(AuthResult { user, access_token })
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let Some(creds) = self.repo.find_by_email(&req.email).await? else {
            // keep the timing of unknown emails close to a wrong password
            match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                Ok(()) | Err(DomainError::InvalidCredentials) => {}
                Err(err) => return Err(err),
            }
            warn!("login attempt for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if let Err(err) = self.verify_password(&req.password, &creds.password_hash) {
            warn!(user_id = creds.user.id, "login rejected");
            return Err(err);
        }

        let access_token = self.issue_token(&creds.user)?;
        Ok(AuthResult {
            user: creds.user,
            access_token,
        })
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.jwt
            .generate_token(user.id, &user.email)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
