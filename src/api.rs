//! Client side of the Colorcor REST API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::{
    config::Config,
    filters::Record,
    models::{Cliente, EstadoNP, Factura, Margen, NotaPedido, PrecioProveedor, Producto, Proveedor, Usuario},
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An entity the API exposes under `/{RESOURCE}`.
pub trait Entity: Record + Serialize + DeserializeOwned + Send + Sync + 'static {
    const RESOURCE: &'static str;
}

impl Entity for Producto {
    const RESOURCE: &'static str = "productos";
}

impl Entity for Proveedor {
    const RESOURCE: &'static str = "proveedores";
}

impl Entity for Cliente {
    const RESOURCE: &'static str = "clientes";
}

impl Entity for Usuario {
    const RESOURCE: &'static str = "usuarios";
}

impl Entity for NotaPedido {
    const RESOURCE: &'static str = "notaspedido";
}

impl Entity for Factura {
    const RESOURCE: &'static str = "facturas";
}

impl Entity for PrecioProveedor {
    const RESOURCE: &'static str = "productosproveedores";
}

impl Entity for Margen {
    const RESOURCE: &'static str = "margenes";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub rol: Option<String>,
    /// RFC 3339 or epoch milliseconds; absent when the API only encodes it in the token.
    #[serde(default)]
    pub expiracion: Option<Value>,
    #[serde(default)]
    pub usuario: Option<Value>,
}

/// Untyped operations against the REST API. Every non-2xx answer is an error.
#[async_trait]
pub trait RestApi: Send + Sync {
    async fn list(&self, token: &str, resource: &str) -> Result<Vec<Value>, ApiError>;
    async fn get(&self, token: &str, resource: &str, id: i64) -> Result<Value, ApiError>;
    async fn create(&self, token: &str, resource: &str, body: Value) -> Result<Value, ApiError>;
    async fn update(&self, token: &str, resource: &str, id: i64, body: Value) -> Result<Value, ApiError>;
    async fn delete(&self, token: &str, resource: &str, id: i64) -> Result<(), ApiError>;
    async fn set_status(&self, token: &str, id: i64, estado: EstadoNP) -> Result<(), ApiError>;
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;
}

pub async fn get_one<T: Entity>(api: &dyn RestApi, token: &str, id: i64) -> Result<T, ApiError> {
    let value = api.get(token, T::RESOURCE, id).await?;
    Ok(serde_json::from_value(value)?)
}

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    fn request(&self, method: Method, token: &str, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.client.request(method, url);
        if token.is_empty() {
            builder
        } else {
            builder.bearer_auth(token)
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RestApi for HttpApi {
    async fn list(&self, token: &str, resource: &str) -> Result<Vec<Value>, ApiError> {
        self.send_json(self.request(Method::GET, token, resource)).await
    }

    async fn get(&self, token: &str, resource: &str, id: i64) -> Result<Value, ApiError> {
        let path = format!("{}/{}", resource, id);
        self.send_json(self.request(Method::GET, token, &path)).await
    }

    async fn create(&self, token: &str, resource: &str, body: Value) -> Result<Value, ApiError> {
        let builder = self.request(Method::POST, token, resource).json(&body);
        self.send_json(builder).await
    }

    async fn update(&self, token: &str, resource: &str, id: i64, body: Value) -> Result<Value, ApiError> {
        let path = format!("{}/{}", resource, id);
        let builder = self.request(Method::PUT, token, &path).json(&body);
        self.send_json(builder).await
    }

    async fn delete(&self, token: &str, resource: &str, id: i64) -> Result<(), ApiError> {
        let path = format!("{}/{}", resource, id);
        self.send(self.request(Method::DELETE, token, &path)).await?;
        Ok(())
    }

    async fn set_status(&self, token: &str, id: i64, estado: EstadoNP) -> Result<(), ApiError> {
        let path = format!("{}/{}/estado", NotaPedido::RESOURCE, id);
        let builder = self
            .request(Method::PATCH, token, &path)
            .json(&json!({ "estado": estado }));
        self.send(builder).await?;
        Ok(())
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.request(Method::POST, "", "auth/login").json(credentials);
        self.send_json(builder).await
    }
}
