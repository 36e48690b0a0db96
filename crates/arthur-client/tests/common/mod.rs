pub mod http_mock;
