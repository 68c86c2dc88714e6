pub mod template_server;
