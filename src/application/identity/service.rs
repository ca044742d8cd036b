//! User management service: application-layer orchestration
//!
//! All account business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::{normalize_email, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::domain::{
    can_access, visibility, CreateUserDto, DomainError, DomainResult, FieldErrors, GetUserDto,
    Operation, RegisterUserDto, RepositoryProvider, UpdateProfileDto, UpdateUserDto, User,
    UserAccount, UserProfile, UserSortField,
};
use crate::infrastructure::crypto::{generate_token_key, PasswordHasher};
use crate::shared::{PageRequest, PaginatedResult};

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";
const CREDENTIALS_REQUIRED: &str = "Username and password are required.";
const INVALID_TOKEN: &str = "Invalid token.";
const USER_INACTIVE: &str = "User inactive or deleted.";
const NOT_OWNER: &str = "You do not have permission to perform this action.";

/// Token + account returned by registration and login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub account: UserAccount,
}

/// User service: orchestrates all identity / account use-cases.
///
/// Holds the repositories behind `RepositoryProvider` so it stays decoupled
/// from the concrete persistence layer.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, hasher: PasswordHasher) -> Self {
        Self { repos, hasher }
    }

    // ── Registration ────────────────────────────────────────────

    /// Create identity, blank profile and token in one go.
    pub async fn register(&self, dto: RegisterUserDto) -> DomainResult<AuthResult> {
        let (account, token) = self.create_account(dto, false, false).await?;
        info!(user_id = %account.user.id, username = %account.user.username, "New user registered");
        Ok(AuthResult { token, account })
    }

    /// Authenticated creation through the collection endpoint. Same checks
    /// and side effects as [`register`](Self::register).
    pub async fn create_user(&self, caller: &User, dto: RegisterUserDto) -> DomainResult<UserAccount> {
        let (account, _) = self.create_account(dto, false, false).await?;
        info!(
            user_id = %account.user.id,
            created_by = %caller.id,
            "User created"
        );
        Ok(account)
    }

    /// Create a staff superuser when the store holds no identities yet.
    pub async fn ensure_superuser(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(None);
        }

        let dto = RegisterUserDto {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        };
        let (account, _) = self.create_account(dto, true, true).await?;
        info!(username = %account.user.username, "Bootstrap superuser created");
        Ok(Some(account.user))
    }

    async fn create_account(
        &self,
        mut dto: RegisterUserDto,
        is_staff: bool,
        is_superuser: bool,
    ) -> DomainResult<(UserAccount, String)> {
        dto.email = normalize_email(&dto.email);

        let mut errors = FieldErrors::new();
        self.check_unique(&mut errors, Some(&dto.username), Some(&dto.email), None)
            .await?;
        errors.into_result()?;

        let password_hash = self.hasher.hash(&dto.password).await?;
        let create = CreateUserDto {
            username: dto.username,
            email: dto.email,
            password_hash,
            first_name: dto.first_name,
            last_name: dto.last_name,
            is_staff,
            is_superuser,
        };

        // The unique indexes still guard against a concurrent registration
        // slipping in between the checks above and this insert.
        let (account, token) = self
            .repos
            .users()
            .create_account(create, generate_token_key())
            .await?;
        Ok((account, token.key))
    }

    /// Add "already taken" errors for values owned by someone other than
    /// `except_id`.
    async fn check_unique(
        &self,
        errors: &mut FieldErrors,
        username: Option<&str>,
        email: Option<&str>,
        except_id: Option<&str>,
    ) -> DomainResult<()> {
        let taken = |user: Option<User>| user.is_some_and(|u| Some(u.id.as_str()) != except_id);

        if let Some(username) = username {
            if taken(self.repos.users().get_user_by_username(username).await?) {
                errors.add("username", USERNAME_TAKEN);
            }
        }
        if let Some(email) = email {
            if taken(self.repos.users().get_user_by_email(email).await?) {
                errors.add("email", EMAIL_TAKEN);
            }
        }
        Ok(())
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check credentials and return the identity's token, creating it on
    /// first login. Repeated logins return the same key.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(FieldErrors::non_field(CREDENTIALS_REQUIRED)));
        }

        let Some(user) = self.repos.users().get_user_by_username(username).await? else {
            warn!(username, "Login rejected: unknown username");
            return Err(DomainError::Validation(FieldErrors::non_field(INVALID_CREDENTIALS)));
        };

        if !self.hasher.verify(password, &user.password_hash).await {
            warn!(username, "Login rejected: wrong password");
            return Err(DomainError::Validation(FieldErrors::non_field(INVALID_CREDENTIALS)));
        }

        // Same message as a bad password so the response does not reveal
        // that a disabled account exists.
        if !user.is_active {
            warn!(username, "Login rejected: account disabled");
            return Err(DomainError::Validation(FieldErrors::non_field(INVALID_CREDENTIALS)));
        }

        self.repos.users().record_login(&user.id).await?;
        let token = self
            .repos
            .tokens()
            .get_or_create(&user.id, generate_token_key())
            .await?;
        let account = self.account(&user.id).await?;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(AuthResult {
            token: token.key,
            account,
        })
    }

    /// Destroy the caller's token.
    pub async fn logout(&self, caller: &User) -> DomainResult<()> {
        if !self.repos.tokens().delete_for_user(&caller.id).await? {
            return Err(DomainError::TokenMissing(
                "No active token for this user.".into(),
            ));
        }
        info!(user_id = %caller.id, "User logged out");
        Ok(())
    }

    /// Resolve a bearer key to its active identity.
    pub async fn authenticate(&self, key: &str) -> DomainResult<User> {
        let Some(token) = self.repos.tokens().find_by_key(key).await? else {
            return Err(DomainError::Unauthorized(INVALID_TOKEN.into()));
        };

        match self.repos.users().get_user_by_id(&token.user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(DomainError::Unauthorized(USER_INACTIVE.into())),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn current_account(&self, caller: &User) -> DomainResult<UserAccount> {
        self.account(&caller.id).await
    }

    /// Identities visible to `caller`, searched, sorted and paginated.
    pub async fn list_users(
        &self,
        caller: &User,
        search: Option<String>,
        page: PageRequest,
        sort_by: UserSortField,
    ) -> DomainResult<PaginatedResult<UserAccount>> {
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.repos
            .users()
            .list_accounts(GetUserDto {
                visibility: visibility(caller),
                search,
                page,
                sort_by,
            })
            .await
    }

    pub async fn get_user(&self, caller: &User, id: &str) -> DomainResult<UserAccount> {
        self.load_target(caller, id, Operation::Read).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Owner-only update of the identity fields.
    pub async fn update_user(
        &self,
        caller: &User,
        id: &str,
        mut dto: UpdateUserDto,
    ) -> DomainResult<UserAccount> {
        self.load_target(caller, id, Operation::Write).await?;

        dto.email = dto.email.as_deref().map(normalize_email);
        let mut errors = FieldErrors::new();
        self.check_unique(&mut errors, dto.username.as_deref(), dto.email.as_deref(), Some(id))
            .await?;
        errors.into_result()?;

        self.repos
            .users()
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        info!(user_id = id, "User updated");
        self.account(id).await
    }

    /// Partial update of the profile attached to `user_id`, by its owner or
    /// by staff.
    pub async fn update_profile(
        &self,
        caller: &User,
        user_id: &str,
        dto: UpdateProfileDto,
    ) -> DomainResult<UserProfile> {
        let target = self
            .load_target(caller, user_id, Operation::ProfileWrite)
            .await?;

        if dto.is_empty() {
            return Ok(target.profile);
        }

        self.repos
            .profiles()
            .update_profile(user_id, dto)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "UserProfile",
                field: "user_id",
                value: user_id.to_string(),
            })
    }

    /// Owner-only deactivation. The identity stays in the store; its token
    /// is revoked so existing sessions end immediately.
    pub async fn deactivate_user(&self, caller: &User, id: &str) -> DomainResult<()> {
        self.load_target(caller, id, Operation::Write).await?;

        self.repos.users().set_active(id, false).await?;
        self.repos.tokens().delete_for_user(id).await?;
        info!(user_id = id, "User deactivated");
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn account(&self, id: &str) -> DomainResult<UserAccount> {
        self.repos
            .users()
            .get_account(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Invisible targets look missing; visible ones the caller may not
    /// write are forbidden.
    async fn load_target(
        &self,
        caller: &User,
        id: &str,
        operation: Operation,
    ) -> DomainResult<UserAccount> {
        let account = self.account(id).await?;

        if !can_access(caller, &account, Operation::Read) {
            return Err(DomainError::user_not_found(id));
        }
        if !can_access(caller, &account, operation) {
            return Err(DomainError::Forbidden(NOT_OWNER.into()));
        }
        Ok(account)
    }
}
