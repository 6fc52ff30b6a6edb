use std::collections::HashMap ;

use crate::error::HostResult ;
use crate::marshal::encode_property_path ;



pub(crate) type ForeignFunction = Box<dyn FnMut( &[u8] ) -> HostResult<Vec<u8>>>;

/// Settings a [`HostEmulator`]( super::HostEmulator ) starts with.
///
/// ```
/// use proxy_wasm_link::EmulatorOptions ;
///
/// let options = EmulatorOptions::new()
/// 	.with_vm_id( "edge" )
/// 	.with_plugin_configuration( br#"{"header":"x-edge"}"#.to_vec() )
/// 	.with_property( &[ "route", "name" ], b"svcA".to_vec() )
/// 	.with_foreign_function( "echo", | params | Ok( params.to_vec() ));
/// # let _ = options ;
/// ```
#[must_use = "pass the options to HostEmulator::with_options"]
#[derive( Default )]
pub struct EmulatorOptions {
	pub(crate) vm_id: String,
	pub(crate) vm_configuration: Vec<u8>,
	pub(crate) plugin_configuration: Vec<u8>,
	pub(crate) properties: HashMap<Vec<u8>, Vec<u8>>,
	pub(crate) foreign_functions: HashMap<String, ForeignFunction>,
}

impl std::fmt::Debug for EmulatorOptions {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "EmulatorOptions" )
			.field( "vm_id", &self.vm_id )
			.field( "vm_configuration", &self.vm_configuration.len() )
			.field( "plugin_configuration", &self.plugin_configuration.len() )
			.field( "properties", &self.properties.len() )
			.field( "foreign_functions", &self.foreign_functions.keys().collect::<Vec<_>>() )
			.finish()
	}
}

impl EmulatorOptions {

	pub fn new() -> Self { Self::default() }

	/// The vm id shared queues are registered under. Empty by default.
	pub fn with_vm_id( mut self, vm_id: impl Into<String> ) -> Self {
		self.vm_id = vm_id.into();
		self
	}

	/// Bytes served as [`BufferType::VmConfiguration`]( crate::BufferType::VmConfiguration ).
	pub fn with_vm_configuration( mut self, configuration: Vec<u8> ) -> Self {
		self.vm_configuration = configuration ;
		self
	}

	/// Bytes served as [`BufferType::PluginConfiguration`]( crate::BufferType::PluginConfiguration ).
	pub fn with_plugin_configuration( mut self, configuration: Vec<u8> ) -> Self {
		self.plugin_configuration = configuration ;
		self
	}

	/// Seeds a property.
	///
	/// # Panics
	/// When `path` is empty.
	pub fn with_property( mut self, path: &[&str], value: Vec<u8> ) -> Self {
		match encode_property_path( path ) {
			Ok( path ) => { self.properties.insert( path, value ); }
			Err( _ ) => panic!( "property path must not be empty" ),
		}
		self
	}

	/// Registers a function guests reach through `call_foreign_function`.
	pub fn with_foreign_function(
		mut self,
		name: impl Into<String>,
		function: impl FnMut( &[u8] ) -> HostResult<Vec<u8>> + 'static,
	) -> Self {
		self.foreign_functions.insert( name.into(), Box::new( function ));
		self
	}

}
