use crate::SUB_PROVIDER_NAME;
use crate::clientfactory::ClientFactory;
use crate::model::SubModel;
use hpe_subprovider::ProviderData;
use std::sync::Arc;

pub(crate) const TEST_TOKEN: &str = "test-token";

/// Provider data whose factory talks to `uri` with a fixed access token
pub(crate) fn provider_data(uri: &str) -> ProviderData {
    let factory = ClientFactory::new(SubModel::new(uri).with_access_token(TEST_TOKEN));
    let mut data = ProviderData::new();
    data.insert(SUB_PROVIDER_NAME, Arc::new(factory));
    data
}
