pub const DEFAULT_VK_API_URL: &str = "https://api.vk.com/method";
pub const DEFAULT_VK_API_VERSION: &str = "5.199";
pub const DEFAULT_DISK_API_URL: &str = "https://cloud-api.yandex.net";

/// Credentials and endpoint for the photo source.
#[derive(Debug, Clone)]
pub struct VkConfig {
    pub access_token: String,
    pub owner_id: String,
    pub api_url: String,
    pub api_version: String,
}

impl VkConfig {
    pub fn new(access_token: &str, owner_id: &str) -> VkConfig {
        VkConfig {
            access_token: access_token.to_string(),
            owner_id: owner_id.to_string(),
            api_url: DEFAULT_VK_API_URL.to_string(),
            api_version: DEFAULT_VK_API_VERSION.to_string(),
        }
    }
}

/// Credentials and endpoint for the destination disk.
#[derive(Debug, Clone)]
pub struct DiskConfig {
    pub token: String,
    pub api_url: String,
    /// Replace files that already exist at the upload path.
    pub overwrite: bool,
}

impl DiskConfig {
    pub fn new(token: &str) -> DiskConfig {
        DiskConfig {
            token: token.to_string(),
            api_url: DEFAULT_DISK_API_URL.to_string(),
            overwrite: false,
        }
    }

    pub fn auth_header(&self) -> String {
        format!("OAuth {token}", token = self.token)
    }
}
