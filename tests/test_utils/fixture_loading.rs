#[macro_export]
macro_rules! fixture_path {
	( $name:literal ) => {
		std::path::PathBuf::from( env!( "CARGO_MANIFEST_DIR" ))
			.join( "tests" )
			.join( "fixtures" )
			.join( $name )
	};
}

mod fixture_loading {

	use once_cell::sync::Lazy ;
	use proxy_wasm_link::{ Config, Engine, Module, WasmGuest };

	pub static ENGINE: Lazy<Engine> = Lazy::new( Engine::default );

	pub static FUEL_ENGINE: Lazy<Engine> = Lazy::new(|| {
		let mut config = Config::new();
		config.consume_fuel( true );
		Engine::new( &config ).expect( "failed to create fuel engine" )
	});

	pub fn module( engine: &Engine, path: std::path::PathBuf ) -> Module {
		Module::from_file( engine, &path )
			.unwrap_or_else(| error | panic!( "failed to compile {}: {}", path.display(), error ))
	}

	pub fn guest( engine: &Engine, path: std::path::PathBuf ) -> WasmGuest {
		WasmGuest::new( engine, &module( engine, path )).expect( "failed to instantiate guest" )
	}

}
