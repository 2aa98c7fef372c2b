mod quality;
mod validator;
