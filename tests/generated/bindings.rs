// Generated from the scripting interface of OpenModelica 1.22.0.
// Interface md5: 0a188d7a5195e0f3276877040242cde0
// Do not edit: regenerate from the interface document instead.
//
// Not generated:
//   record OpenModelica.Scripting.Held: Expression is opaque code type
//   function OpenModelica.Scripting.eval: Expression is opaque code type
#![allow(
    dead_code,
    non_camel_case_types,
    non_snake_case,
    unused_imports,
    unused_mut,
    clippy::all
)]

use omc_scripting::runtime as rt;
use omc_scripting::runtime::{FromValue as _, IntoValue as _};

/// Access levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// nothing visible
    hide = 1,
    icon = 2,
    all = 3,
}

impl Access {
    pub const TYPE_NAME: &'static str = "OpenModelica.Scripting.Access";

    pub fn value_type() -> Result<rt::ValueType, rt::ScriptingError> {
        Ok(rt::EnumerationType::new(Self::TYPE_NAME, &["hide", "icon", "all"])?.into())
    }

    /// 1-based position in the declaration.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn member(self) -> &'static str {
        match self {
            Self::hide => "hide",
            Self::icon => "icon",
            Self::all => "all",
        }
    }
}

impl rt::fmt::Display for Access {
    fn fmt(&self, f: &mut rt::fmt::Formatter<'_>) -> rt::fmt::Result {
        write!(f, "{}.{}", Self::TYPE_NAME, self.member())
    }
}

impl rt::IntoValue for Access {
    fn into_value(self) -> Result<rt::Value, rt::ScriptingError> {
        Ok(rt::Value::Enumeration(rt::EnumerationValue {
            type_name: rt::QualifiedName::parse(Self::TYPE_NAME)?,
            member: rt::Identifier::new(self.member())?,
            ordinal: self.ordinal(),
        }))
    }
}

impl rt::FromValue for Access {
    fn from_value(value: rt::Value) -> Result<Self, rt::ScriptingError> {
        match value.into_ordinal(Self::TYPE_NAME)? {
            1 => Ok(Self::hide),
            2 => Ok(Self::icon),
            3 => Ok(Self::all),
            other => Err(rt::ScriptingError::TypeMismatch {
                argument: Self::TYPE_NAME.to_string(),
                expected: Self::TYPE_NAME.to_string(),
                found: format!("ordinal {}", other),
            }),
        }
    }
}

/// Pair of values
#[derive(Clone, Debug, PartialEq)]
pub struct R {
    pub a: i64,
    pub b: String,
}

impl R {
    pub const TYPE_NAME: &'static str = "OpenModelica.Scripting.R";

    pub fn value_type() -> Result<rt::ValueType, rt::ScriptingError> {
        Ok(rt::RecordType::builder(Self::TYPE_NAME)?
            .element("a", rt::ValueType::Integer, rt::Shape::scalar())?
            .element("b", rt::ValueType::String, rt::Shape::scalar())?
            .build_type())
    }
}

impl rt::IntoValue for R {
    fn into_value(self) -> Result<rt::Value, rt::ScriptingError> {
        let mut record = rt::RecordValue::new(rt::QualifiedName::parse(Self::TYPE_NAME)?);
        record.insert(rt::Identifier::new("a")?, self.a.into_value()?);
        record.insert(rt::Identifier::new("b")?, self.b.into_value()?);
        Ok(rt::Value::Record(record))
    }
}

impl rt::FromValue for R {
    fn from_value(value: rt::Value) -> Result<Self, rt::ScriptingError> {
        let mut record = value.into_record(Self::TYPE_NAME)?;
        Ok(Self {
            a: rt::FromValue::from_value(record.take("a")?)?,
            b: rt::FromValue::from_value(record.take("b")?)?,
        })
    }
}

/// Typed calls over one [`Session`](rt::Session).
pub struct Client {
    session: rt::Session,
}

/// Wrap an open channel in a generated client.
pub fn open_session(channel: impl rt::CommandChannel + 'static) -> Client {
    Client::from_session(rt::Session::new(channel))
}

impl Client {
    pub fn from_session(session: rt::Session) -> Self {
        Self { session }
    }

    pub fn session_mut(&mut self) -> &mut rt::Session {
        &mut self.session
    }

    pub fn into_session(self) -> rt::Session {
        self.session
    }

    /// Builds an R
    ///
    /// * `x`
    /// * `y`: second field (default `"z"`)
    pub fn f(&mut self, x: i64, y: Option<String>) -> Result<R, rt::ScriptingError> {
        let arguments: Vec<(&str, Option<rt::Value>)> = vec![
            ("x", rt::cast_value("x", Some(x.into_value()?), false, &rt::ValueType::Integer, &rt::Shape::scalar())?),
            ("y", rt::cast_value("y", rt::optional_value(y)?, true, &rt::ValueType::String, &rt::Shape::scalar())?),
        ];
        let outputs: Vec<rt::OutputSchema> = vec![
            rt::OutputSchema::new(R::value_type()?, rt::Shape::scalar()),
        ];
        let reply = self.session.invoke("OpenModelica.Scripting.f", rt::CallStyle::Keyword, arguments, &outputs)?;
        rt::FromValue::from_value(reply)
    }

    /// Builds an R
    pub fn fAlias(&mut self, x: i64, y: Option<String>) -> Result<R, rt::ScriptingError> {
        self.f(x, y)
    }

    /// load file (*.mo) and merge it with the loaded AST.
    ///
    /// * `fileName`
    /// * `encoding` (default `"UTF-8"`)
    /// * `uses` (default `true`)
    pub fn loadFile(&mut self, fileName: String, encoding: Option<String>, uses: Option<bool>) -> Result<bool, rt::ScriptingError> {
        let arguments: Vec<(&str, Option<rt::Value>)> = vec![
            ("fileName", rt::cast_value("fileName", Some(fileName.into_value()?), false, &rt::ValueType::String, &rt::Shape::scalar())?),
            ("encoding", rt::cast_value("encoding", rt::optional_value(encoding)?, true, &rt::ValueType::String, &rt::Shape::scalar())?),
            ("uses", rt::cast_value("uses", rt::optional_value(uses)?, true, &rt::ValueType::Boolean, &rt::Shape::scalar())?),
        ];
        let outputs: Vec<rt::OutputSchema> = vec![
            rt::OutputSchema::new(rt::ValueType::Boolean, rt::Shape::scalar()),
        ];
        let reply = self.session.invoke("OpenModelica.Scripting.loadFile", rt::CallStyle::Keyword, arguments, &outputs)?;
        rt::FromValue::from_value(reply)
    }

    /// * `cl` (default `$Code(OpenModelica)`)
    pub fn getVersion(&mut self, cl: Option<rt::QualifiedName>) -> Result<String, rt::ScriptingError> {
        let arguments: Vec<(&str, Option<rt::Value>)> = vec![
            ("cl", rt::cast_value("cl", rt::optional_value(cl)?, true, &rt::ValueType::TypeName, &rt::Shape::scalar())?),
        ];
        let outputs: Vec<rt::OutputSchema> = vec![
            rt::OutputSchema::new(rt::ValueType::String, rt::Shape::scalar()),
        ];
        let reply = self.session.invoke("OpenModelica.Scripting.getVersion", rt::CallStyle::Keyword, arguments, &outputs)?;
        rt::FromValue::from_value(reply)
    }

    /// * `fileName`
    /// * `rows`
    pub fn readMatrix(&mut self, fileName: String, rows: i64) -> Result<Vec<Vec<f64>>, rt::ScriptingError> {
        let arguments: Vec<(&str, Option<rt::Value>)> = vec![
            ("fileName", rt::cast_value("fileName", Some(fileName.into_value()?), false, &rt::ValueType::String, &rt::Shape::scalar())?),
            ("rows", rt::cast_value("rows", Some(rows.into_value()?), false, &rt::ValueType::Integer, &rt::Shape::scalar())?),
        ];
        let outputs: Vec<rt::OutputSchema> = vec![
            rt::OutputSchema::new(rt::ValueType::Real, rt::Shape::new(vec![rt::Dimension::Unbounded, rt::Dimension::Unbounded])),
        ];
        let reply = self.session.invoke("OpenModelica.Scripting.readMatrix", rt::CallStyle::Positional, arguments, &outputs)?;
        rt::FromValue::from_value(reply)
    }

    /// * `cl`
    /// * `level`
    pub fn setAccess(&mut self, cl: rt::QualifiedName, level: Access) -> Result<bool, rt::ScriptingError> {
        let arguments: Vec<(&str, Option<rt::Value>)> = vec![
            ("cl", rt::cast_value("cl", Some(cl.into_value()?), false, &rt::ValueType::TypeName, &rt::Shape::scalar())?),
            ("level", rt::cast_value("level", Some(level.into_value()?), false, &Access::value_type()?, &rt::Shape::scalar())?),
        ];
        let outputs: Vec<rt::OutputSchema> = vec![
            rt::OutputSchema::new(rt::ValueType::Boolean, rt::Shape::scalar()),
        ];
        let reply = self.session.invoke("OpenModelica.Scripting.setAccess", rt::CallStyle::Positional, arguments, &outputs)?;
        rt::FromValue::from_value(reply)
    }

    /// * `x`
    pub fn sizes(&mut self, x: Vec<f64>) -> Result<(i64, f64), rt::ScriptingError> {
        let arguments: Vec<(&str, Option<rt::Value>)> = vec![
            ("x", rt::cast_value("x", Some(x.into_value()?), false, &rt::ValueType::Real, &rt::Shape::new(vec![rt::Dimension::Fixed(3)]))?),
        ];
        let outputs: Vec<rt::OutputSchema> = vec![
            rt::OutputSchema::new(rt::ValueType::Integer, rt::Shape::scalar()),
            rt::OutputSchema::new(rt::ValueType::Real, rt::Shape::scalar()),
        ];
        let reply = self.session.invoke("OpenModelica.Scripting.sizes", rt::CallStyle::Positional, arguments, &outputs)?;
        rt::FromValue::from_value(reply)
    }
}
