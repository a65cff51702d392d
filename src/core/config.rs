use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Token signing and credential hashing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing bearer tokens
    pub jwt_secret: String,
    /// Token validity window in hours
    pub token_validity_hours: i64,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
}

/// MinIO/S3 storage configuration for uploaded blobs
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing blobs
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(AppConfig {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|e| format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e))?;

        let min_connections = env::var("DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .map_err(|e| format!("Invalid DATABASE_MIN_CONNECTIONS: {}", e))?;

        Ok(DatabaseConfig {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;
    const DEFAULT_BCRYPT_COST: u32 = 12;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let token_validity_hours = env::var("TOKEN_VALIDITY_HOURS")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .map_err(|e| format!("Invalid TOKEN_VALIDITY_HOURS: {}", e))?
            .unwrap_or(Self::DEFAULT_TOKEN_VALIDITY_HOURS);

        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| format!("Invalid BCRYPT_COST: {}", e))?
            .unwrap_or(Self::DEFAULT_BCRYPT_COST);

        Ok(AuthConfig {
            jwt_secret,
            token_validity_hours,
            bcrypt_cost,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(StorageConfig {
            endpoint: env::var("STORAGE_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            access_key: env::var("STORAGE_ACCESS_KEY")
                .map_err(|_| "STORAGE_ACCESS_KEY must be set".to_string())?,
            secret_key: env::var("STORAGE_SECRET_KEY")
                .map_err(|_| "STORAGE_SECRET_KEY must be set".to_string())?,
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "filecove".to_string()),
            region: env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(SwaggerConfig {
            username: env::var("SWAGGER_USERNAME").ok(),
            password: env::var("SWAGGER_PASSWORD").ok(),
            title: env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Filecove API".to_string()),
            version: env::var("SWAGGER_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            description: env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
                "Authenticated file storage with short-link sharing".to_string()
            }),
        })
    }

    /// Returns "username:password" when both are configured
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(format!("{}:{}", username, password)),
            _ => None,
        }
    }
}
